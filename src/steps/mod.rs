pub mod bootloader;
pub mod desktop;
pub mod finalize;
pub mod fstab;
pub mod hostname;
pub mod locale;
pub mod network;
pub mod ntp;
pub mod packages;
pub mod partition;
pub mod users;

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    cmd::{Cmd, Shell},
    config::{InstallConfig, Settings},
    error::InstallerError,
    ui,
};

// ── Step abstraction ──────────────────────────────────────────────────────────

/// One named unit of work. `plan` lists the commands the step runs, in order.
pub struct Step<C> {
    pub name: &'static str,
    pub title: &'static str,
    pub plan: fn(&C) -> Vec<Cmd>,
}

/// Runs `steps` in order, each command through `shell`.
///
/// The first failing command stops everything: its step is reported and no
/// later command or step runs. Nothing already done is undone.
pub fn run<C>(steps: &[Step<C>], ctx: &C, shell: &mut dyn Shell) -> Result<(), InstallerError> {
    let total = steps.len();

    for (i, step) in steps.iter().enumerate() {
        ui::print_step(i + 1, total, step.title);
        info!("step '{}' started", step.name);

        for cmd in (step.plan)(ctx) {
            shell.run(&cmd).map_err(|e| InstallerError::Step {
                step: step.name,
                source: Box::new(e),
            })?;
        }

        info!("step '{}' finished", step.name);
    }

    Ok(())
}

// ── Installation ──────────────────────────────────────────────────────────────

/// Everything an install step may read.
pub struct Context<'a> {
    pub config: &'a InstallConfig,
    pub settings: &'a Settings,
}

impl Context<'_> {
    pub fn root(&self) -> &Path {
        &self.settings.mount_root
    }

    /// A path inside the new system, as seen from the live environment.
    pub fn in_root(&self, path: &str) -> PathBuf {
        self.root().join(path.trim_start_matches('/'))
    }

    /// A command run inside the new system.
    pub fn chroot(&self, program: &str) -> Cmd {
        Cmd::chroot(self.root(), program)
    }
}

/// The installation sequence, in execution order.
pub fn install_steps<'a>() -> [Step<Context<'a>>; 11] {
    [
        Step { name: "sync-clock",         title: "Time Synchronization",     plan: ntp::plan },
        Step { name: "partition-disk",     title: "Disk Partitioning",        plan: partition::plan },
        Step { name: "bootstrap-packages", title: "Base System Installation", plan: packages::plan },
        Step { name: "generate-fstab",     title: "Filesystem Table",         plan: fstab::plan },
        Step { name: "localization",       title: "Timezone and Locale",      plan: locale::plan },
        Step { name: "hostname",           title: "Hostname",                 plan: hostname::plan },
        Step { name: "network",            title: "Network Services",         plan: network::plan },
        Step { name: "users",              title: "Users and Passwords",      plan: users::plan },
        Step { name: "bootloader",         title: "Bootloader",               plan: bootloader::plan },
        Step { name: "desktop",            title: "Desktop Environment",      plan: desktop::plan },
        Step { name: "finalize",           title: "Finishing Up",             plan: finalize::plan },
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cmd::testing::RecordingShell,
        config::{BootMode, Desktop},
    };

    #[test]
    fn steps_run_in_canonical_order() {
        let names: Vec<&str> = install_steps().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "sync-clock",
                "partition-disk",
                "bootstrap-packages",
                "generate-fstab",
                "localization",
                "hostname",
                "network",
                "users",
                "bootloader",
                "desktop",
                "finalize",
            ]
        );
    }

    #[test]
    fn full_run_ends_with_unmount() {
        let config = fixtures::config(BootMode::Uefi, Desktop::Gnome);
        let settings = fixtures::settings();
        let ctx = Context { config: &config, settings: &settings };
        let mut shell = RecordingShell::default();

        run(&install_steps(), &ctx, &mut shell).unwrap();

        let lines = shell.lines();
        assert_eq!(lines.first().map(String::as_str), Some("timedatectl set-ntp true"));
        assert_eq!(lines.last().map(String::as_str), Some("umount -R /mnt"));
    }

    #[test]
    fn partition_failure_stops_the_run() {
        let config = fixtures::config(BootMode::Uefi, Desktop::None);
        let settings = fixtures::settings();
        let ctx = Context { config: &config, settings: &settings };
        let mut shell = RecordingShell::failing_on("sfdisk", 1);

        let err = run(&install_steps(), &ctx, &mut shell).unwrap_err();

        match &err {
            InstallerError::Step { step, .. } => assert_eq!(*step, "partition-disk"),
            other => panic!("unexpected error: {other}"),
        }
        assert_ne!(err.exit_code(), 0);
        assert_eq!(shell.commands.last().map(|c| c.program()), Some("sfdisk"));
        assert!(!shell.commands.iter().any(|c| c.program() == "pacstrap"));
        assert!(!shell.commands.iter().any(|c| c.program() == "mkswap"));
    }

    #[test]
    fn generic_runner_stops_mid_step() {
        struct Count;
        fn two(_: &Count) -> Vec<Cmd> {
            vec![Cmd::new("first"), Cmd::new("second")]
        }
        fn three(_: &Count) -> Vec<Cmd> {
            vec![Cmd::new("third")]
        }
        let steps = [
            Step { name: "a", title: "A", plan: two },
            Step { name: "b", title: "B", plan: three },
        ];
        let mut shell = RecordingShell::failing_on("first", 3);

        let err = run(&steps, &Count, &mut shell).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(shell.lines(), ["first"]);
    }

    #[test]
    fn in_root_joins_absolute_paths() {
        let config = fixtures::config(BootMode::Bios, Desktop::None);
        let settings = fixtures::settings();
        let ctx = Context { config: &config, settings: &settings };
        assert_eq!(ctx.in_root("/etc/fstab"), PathBuf::from("/mnt/etc/fstab"));
    }
}
