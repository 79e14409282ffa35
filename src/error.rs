use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command '{0}' failed with exit code {1}")]
    CommandFailed(String, i32),

    #[error("Command '{0}' not found — is it installed?")]
    CommandNotFound(String),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<InstallerError>,
    },

    #[error("No installable disk found on this machine")]
    NoDiskFound,

    #[error("Installation cancelled by user")]
    Cancelled,

    #[error("This installer must be run as root (sudo)")]
    NotRoot,

    #[error("No network connection — connect to the Internet and retry")]
    NoNetwork,

    #[error("Environment variable '{0}' is not set")]
    MissingEnv(&'static str),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Could not initialise logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl InstallerError {
    /// Process exit code for this error.
    ///
    /// A declined confirmation and an empty disk listing are early, clean
    /// exits. A failed command hands its own exit status through.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallerError::Cancelled | InstallerError::NoDiskFound => 0,
            InstallerError::CommandFailed(_, code) if *code > 0 => *code,
            InstallerError::Step { source, .. } => match source.exit_code() {
                0 => 1,
                code => code,
            },
            _ => 1,
        }
    }

    /// True for the exits that are not failures (see [`exit_code`](Self::exit_code)).
    pub fn is_early_exit(&self) -> bool {
        matches!(self, InstallerError::Cancelled | InstallerError::NoDiskFound)
    }
}
