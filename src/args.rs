use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{config::Settings, setup::SetupTask};

/// Interactive Arch Linux installer.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Print every command instead of running it; nothing on disk is touched
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Mirror the debug log on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Where the debug log is written
    #[arg(long, global = true, default_value = "/tmp/arch-installer.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Partition a disk and install Arch Linux on it (default)
    Install(InstallArgs),
    /// Post-install provisioning, run as a regular user on the new system
    Setup(SetupArgs),
}

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Where the new root filesystem is mounted during installation
    #[arg(long, default_value = "/mnt")]
    pub mount_root: PathBuf,

    /// Timezone under /usr/share/zoneinfo
    #[arg(long, default_value = "Asia/Shanghai")]
    pub timezone: String,

    /// Locale to enable; repeatable, the first one becomes LANG
    #[arg(long = "locale", value_name = "LOCALE", default_values = ["en_US.UTF-8", "zh_CN.UTF-8"])]
    pub locales: Vec<String>,

    /// Do not ping archlinux.org before starting
    #[arg(long)]
    pub skip_network_check: bool,
}

impl Default for InstallArgs {
    fn default() -> Self {
        let settings = Settings::default();
        InstallArgs {
            mount_root: settings.mount_root,
            timezone: settings.timezone,
            locales: settings.locales,
            skip_network_check: false,
        }
    }
}

impl InstallArgs {
    pub fn settings(&self) -> Settings {
        Settings {
            mount_root: self.mount_root.clone(),
            timezone: self.timezone.clone(),
            locales: self.locales.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Task to run; repeatable. Without it, tasks are picked interactively
    #[arg(long = "task", value_enum)]
    pub tasks: Vec<SetupTask>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_args(argv: &[&str]) -> InstallArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Command::Install(args)) => args,
            other => panic!("expected install, got {:?}", other),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parsed_defaults_match_builtin_defaults() {
        let parsed = install_args(&["arch-installer", "install"]);
        let builtin = InstallArgs::default();
        assert_eq!(parsed.mount_root, builtin.mount_root);
        assert_eq!(parsed.timezone, builtin.timezone);
        assert_eq!(parsed.locales, builtin.locales);
        assert!(!parsed.skip_network_check);
    }

    #[test]
    fn explicit_locales_replace_defaults() {
        let args = install_args(&[
            "arch-installer",
            "--dry-run",
            "install",
            "--locale",
            "de_DE.UTF-8",
            "--timezone",
            "Europe/Berlin",
        ]);
        let settings = args.settings();
        assert_eq!(settings.locales, ["de_DE.UTF-8"]);
        assert_eq!(settings.lang(), "de_DE.UTF-8");
        assert_eq!(settings.timezone, "Europe/Berlin");
    }

    #[test]
    fn no_subcommand_means_install() {
        let cli = Cli::try_parse_from(["arch-installer", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
        assert!(cli.command.is_none());
    }

    #[test]
    fn setup_tasks_parse_in_kebab_case() {
        let cli = Cli::try_parse_from([
            "arch-installer",
            "setup",
            "--task",
            "oh-my-zsh",
            "--task",
            "docker",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Setup(args)) => {
                assert_eq!(args.tasks, [SetupTask::OhMyZsh, SetupTask::Docker])
            }
            other => panic!("expected setup, got {:?}", other),
        }
    }
}
