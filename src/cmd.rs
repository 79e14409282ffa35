use std::{
    fmt,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use dialoguer::Confirm;
use log::{debug, error, info, warn};

use crate::{config::Secret, error::InstallerError, ui};

// ── Command description ───────────────────────────────────────────────────────

/// Where a command's standard output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Captured behind a spinner; printed only if the command fails.
    Captured,
    /// Inherited terminal, for long-running tools with their own progress output.
    Streamed,
    /// Appended to a file (`>> path`).
    AppendTo(PathBuf),
}

/// One external program invocation, kept as separate argument tokens.
///
/// Nothing is ever joined into a shell string, so hostnames, user names and
/// paths reach the program exactly as typed. Data fed on stdin is held as a
/// [`Secret`] and never shows up in `Display`, `Debug` or the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    stdin: Option<Secret>,
    output: Output,
    allow_failure: bool,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Cmd {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            output: Output::Captured,
            allow_failure: false,
        }
    }

    /// `arch-chroot <root> <program> …`
    pub fn chroot(root: &Path, program: impl Into<String>) -> Self {
        Cmd::new("arch-chroot").path(root).arg(program)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(Secret::new(input));
        self
    }

    pub fn streamed(mut self) -> Self {
        self.output = Output::Streamed;
        self
    }

    pub fn append_to(mut self, file: &Path) -> Self {
        self.output = Output::AppendTo(file.to_path_buf());
        self
    }

    /// Non-zero exit or a missing binary is ignored (cleanup such as `umount`).
    pub fn allow_failure(mut self) -> Self {
        self.allow_failure = true;
        self
    }

    pub fn input(&self) -> Option<&str> {
        self.stdin.as_ref().map(Secret::expose)
    }
}

#[cfg(test)]
impl Cmd {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn allows_failure(&self) -> bool {
        self.allow_failure
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if self.stdin.is_some() {
            f.write_str(" < <stdin>")?;
        }
        if let Output::AppendTo(path) = &self.output {
            write!(f, " >> {}", path.display())?;
        }
        Ok(())
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Executes commands on behalf of the install steps.
pub trait Shell {
    fn run(&mut self, cmd: &Cmd) -> Result<(), InstallerError>;
}

/// Runs commands for real.
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&mut self, cmd: &Cmd) -> Result<(), InstallerError> {
        debug!("running: {}", cmd);

        if cmd.allow_failure {
            if let Err(e) = execute(cmd) {
                debug!("ignored failure of '{}': {}", cmd, e);
            }
            return Ok(());
        }

        match execute(cmd) {
            Err(InstallerError::CommandNotFound(_)) => {
                offer_install(&cmd.program)?;
                execute(cmd)
            }
            other => other,
        }
    }
}

/// Prints every command instead of running it.
pub struct DryRunShell;

impl Shell for DryRunShell {
    fn run(&mut self, cmd: &Cmd) -> Result<(), InstallerError> {
        info!("dry-run: {}", cmd);
        ui::print_info(&format!("[dry-run] {}", cmd));
        Ok(())
    }
}

fn execute(cmd: &Cmd) -> Result<(), InstallerError> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);

    let spinner = match &cmd.output {
        Output::Captured => {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
            (!cmd.allow_failure).then(|| ui::spinner(cmd.to_string()))
        }
        Output::Streamed => None,
        Output::AppendTo(path) => {
            let file = OpenOptions::new().append(true).create(true).open(path)?;
            command.stdout(file).stderr(Stdio::piped());
            None
        }
    };

    let result = spawn_and_wait(&mut command, cmd);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let output = result?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        if !cmd.allow_failure {
            print_captured_output(&output.stdout, &output.stderr);
            error!(
                "'{}' exited with {}: {}",
                cmd,
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        return Err(InstallerError::CommandFailed(cmd.program.clone(), code));
    }

    if cmd.output == Output::Captured && !cmd.allow_failure {
        ui::print_success(&cmd.to_string());
    }
    Ok(())
}

fn spawn_and_wait(
    command: &mut Command,
    cmd: &Cmd,
) -> Result<std::process::Output, InstallerError> {
    if cmd.stdin.is_some() {
        command.stdin(Stdio::piped());
    }

    let mut child = command
        .spawn()
        .map_err(|e| not_found_or_io(&cmd.program, e))?;

    if let (Some(input), Some(mut pipe)) = (cmd.input(), child.stdin.take()) {
        // A child that exits without reading all of its input still has an
        // exit status and stderr worth reporting.
        match pipe.write_all(input.as_bytes()) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("'{}' closed stdin early", cmd);
            }
            other => other?,
        }
        // dropping the pipe closes it so the child sees EOF
    }

    Ok(child.wait_with_output()?)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn not_found_or_io(program: &str, err: io::Error) -> InstallerError {
    if err.kind() == io::ErrorKind::NotFound {
        InstallerError::CommandNotFound(program.to_string())
    } else {
        InstallerError::Io(err)
    }
}

fn print_captured_output(stdout: &[u8], stderr: &[u8]) {
    let out = String::from_utf8_lossy(stdout);
    let err = String::from_utf8_lossy(stderr);
    if !out.trim().is_empty() {
        eprintln!("{}", out.trim());
    }
    if !err.trim().is_empty() {
        eprintln!("{}", err.trim());
    }
}

/// Maps a binary name to the Arch package that ships it.
fn package_for(program: &str) -> &str {
    match program {
        "mkfs.fat" | "mkfs.vfat" | "fsck.fat" | "fatlabel" => "dosfstools",
        "mkfs.ext4" | "mkfs.ext2" | "e2fsck" | "resize2fs" | "tune2fs" => "e2fsprogs",
        "sfdisk" | "fdisk" | "mkswap" | "swapon" | "swapoff" | "mount" | "umount" | "lsblk"
        | "blkid" | "findmnt" | "hwclock" => "util-linux",
        "pacstrap" | "genfstab" | "arch-chroot" => "arch-install-scripts",
        "grub-install" | "grub-mkconfig" => "grub",
        "ping" => "iputils",
        "git" => "git",
        other => other,
    }
}

/// When `program` is not found, asks the operator whether to install the
/// package that provides it with `pacman -S`.
fn offer_install(program: &str) -> Result<(), InstallerError> {
    let pkg = package_for(program);

    ui::print_warning(&format!("Command '{}' not found.", program));
    println!();

    if !Confirm::new()
        .with_prompt(format!("Install '{}' with pacman?", pkg))
        .default(true)
        .interact()?
    {
        return Err(InstallerError::CommandNotFound(program.to_string()));
    }

    warn!("'{}' missing, installing package '{}'", program, pkg);
    println!();
    let status = Command::new("pacman")
        .args(["-Sy", "--noconfirm", pkg])
        .status()
        .map_err(|e| not_found_or_io("pacman", e))?;

    if !status.success() {
        return Err(InstallerError::CommandFailed(
            "pacman".to_string(),
            status.code().unwrap_or(-1),
        ));
    }

    if !succeeds("which", &[program]) {
        ui::print_error(&format!(
            "'{}' still not found after install. Check the package name.",
            program
        ));
        return Err(InstallerError::CommandNotFound(program.to_string()));
    }

    Ok(())
}

// ── Host queries ──────────────────────────────────────────────────────────────

/// Run a read-only command, capture its stdout, and return it as a `String`.
pub fn capture(program: &str, args: &[&str]) -> Result<String, InstallerError> {
    let attempt = |p: &str, a: &[&str]| -> Result<String, InstallerError> {
        let output = Command::new(p)
            .args(a)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| not_found_or_io(p, e))?;

        if !output.status.success() {
            return Err(InstallerError::CommandFailed(
                p.to_string(),
                output.status.code().unwrap_or(-1),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    };

    match attempt(program, args) {
        Err(InstallerError::CommandNotFound(_)) => {
            offer_install(program)?;
            attempt(program, args)
        }
        other => other,
    }
}

/// Runs a command silently and reports only whether it exited with status 0.
pub fn succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

// ── Test support ──────────────────────────────────────────────────────────────
