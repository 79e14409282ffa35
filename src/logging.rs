use std::{fs::File, path::Path};

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use crate::{error::InstallerError, ui};

/// Debug log to `log_file`, plus stderr when `verbose`.
///
/// Operator-facing output goes through [`ui`]; the log is the record of
/// every command that ran. An unwritable log file is reported and skipped.
pub fn init(log_file: &Path, verbose: bool) -> Result<(), InstallerError> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    match File::create(log_file) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
        Err(e) => ui::print_warning(&format!(
            "Cannot write log file {}: {}",
            log_file.display(),
            e
        )),
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
