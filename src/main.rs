mod args;
mod cmd;
mod collect;
mod config;
mod detect;
mod error;
mod logging;
mod lsblk;
mod prompt;
mod setup;
mod steps;
mod ui;

use clap::Parser;
use log::{error, info};

use args::{Cli, Command, InstallArgs, SetupArgs};
use cmd::{DryRunShell, Shell, SystemShell};
use error::InstallerError;

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        println!();
        if e.is_early_exit() {
            ui::print_warning(&e.to_string());
        } else {
            error!("{}", e);
            ui::print_error(&e.to_string());
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), InstallerError> {
    logging::init(&cli.log_file, cli.verbose)?;
    info!("arch-installer {} started", env!("CARGO_PKG_VERSION"));

    let mut shell: Box<dyn Shell> = if cli.dry_run {
        Box::new(DryRunShell)
    } else {
        Box::new(SystemShell)
    };

    match cli.command {
        Some(Command::Setup(args)) => run_setup(&args, shell.as_mut()),
        Some(Command::Install(args)) => run_install(&args, cli.dry_run, shell.as_mut()),
        None => run_install(&InstallArgs::default(), cli.dry_run, shell.as_mut()),
    }
}

// ── install ───────────────────────────────────────────────────────────────────

fn run_install(args: &InstallArgs, dry_run: bool, shell: &mut dyn Shell) -> Result<(), InstallerError> {
    // ── Guard ─────────────────────────────────────────────────────────────────
    if !dry_run {
        detect::check_root()?;
    }

    // ── Welcome ───────────────────────────────────────────────────────────────
    ui::print_banner("Linux Installer  ·  systemd Edition");

    if dry_run {
        ui::print_warning("DRY-RUN MODE — no disk will be touched, no command will run.");
    }
    ui::print_info("This wizard collects every setting first, then installs without further questions.");
    println!();

    // ── Host environment ──────────────────────────────────────────────────────
    if !dry_run && !args.skip_network_check {
        detect::check_network()?;
    }
    let facts = collect::HostFacts {
        boot_mode: detect::boot_mode(),
        cpu_vendor: detect::cpu_vendor(),
        disks: lsblk::list_disks()?,
    };
    println!();

    // ── Configuration ─────────────────────────────────────────────────────────
    let mut console = prompt::Terminal;
    let config = collect::collect(&mut console, facts)?;
    collect::confirm(&mut console, &config)?;

    // ── Installation ──────────────────────────────────────────────────────────
    let settings = args.settings();
    let ctx = steps::Context {
        config: &config,
        settings: &settings,
    };
    steps::run(&steps::install_steps(), &ctx, shell)?;

    println!();
    ui::print_success("Installation complete.");
    ui::print_info("Remove the installation medium and reboot.");
    ui::print_info("After the first login, `arch-installer setup` provisions the desktop.");
    info!("installation finished");
    Ok(())
}

// ── setup ─────────────────────────────────────────────────────────────────────

fn run_setup(args: &SetupArgs, shell: &mut dyn Shell) -> Result<(), InstallerError> {
    ui::print_banner("Post-install Setup");

    let ctx = setup::SetupContext::from_env()?;
    let tasks = if args.tasks.is_empty() {
        setup::pick_tasks()?
    } else {
        args.tasks.clone()
    };

    setup::run(&tasks, &ctx, shell)?;

    println!();
    ui::print_success("Setup complete. Log out and back in to pick up group and profile changes.");
    Ok(())
}
