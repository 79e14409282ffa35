use log::info;

use crate::{
    config::{BootMode, CpuVendor, Desktop, InstallConfig, LoginShell, User},
    error::InstallerError,
    lsblk::Disk,
    prompt::{self, Console},
    ui,
};

/// What was learned from the host before asking anything.
#[derive(Debug, Clone)]
pub struct HostFacts {
    pub boot_mode: BootMode,
    pub cpu_vendor: CpuVendor,
    pub disks: Vec<Disk>,
}

/// Asks the operator for every remaining installation parameter.
/// Does not return until each one is valid.
pub fn collect(
    console: &mut dyn Console,
    facts: HostFacts,
) -> Result<InstallConfig, InstallerError> {
    if facts.disks.is_empty() {
        return Err(InstallerError::NoDiskFound);
    }

    let cpu_vendor = match facts.cpu_vendor {
        CpuVendor::Other => {
            let idx = prompt::choice(
                console,
                "CPU vendor not recognised — pick one for microcode",
                &CpuVendor::ALL,
            )?;
            CpuVendor::ALL[idx]
        }
        known => known,
    };

    let desktop = Desktop::ALL[prompt::choice(console, "Desktop environment", &Desktop::ALL)?];

    let install_disk = match facts.disks.as_slice() {
        [only] => {
            ui::print_info(&format!("Only one disk found, using {}.", only.path));
            only.path.clone()
        }
        disks => {
            let labels: Vec<String> = disks.iter().map(Disk::display).collect();
            disks[prompt::choice_or(console, "Target disk", &labels, 0)?].path.clone()
        }
    };

    let swap_size_gib = prompt::positive_int(console, "Swap size in GiB")?;
    let hostname = prompt::non_empty(console, "Hostname")?;
    let root_password = prompt::secret(console, "Root password")?;
    let users = collect_users(console)?;

    let config = InstallConfig {
        boot_mode: facts.boot_mode,
        cpu_vendor,
        install_disk,
        desktop,
        swap_size_gib,
        hostname,
        root_password,
        users,
    };
    info!("collected configuration: {:?}", config);
    Ok(config)
}

/// Regular accounts, in the order entered. May be empty.
pub fn collect_users(console: &mut dyn Console) -> Result<Vec<User>, InstallerError> {
    let mut users: Vec<User> = Vec::new();

    if !console.confirm("Create a regular user account?", true)? {
        return Ok(users);
    }

    loop {
        let name = prompt::text(console, "Username", |s| validate_username(s, &users))?;
        let password = prompt::secret(console, &format!("Password for {}", name))?;
        let shell = LoginShell::ALL[prompt::choice(console, "Login shell", &LoginShell::ALL)?];

        users.push(User {
            name,
            password,
            shell,
        });

        if !console.confirm("Add another user?", false)? {
            return Ok(users);
        }
    }
}

/// Prints the collected configuration (passwords masked) and asks to go ahead.
pub fn confirm(console: &mut dyn Console, config: &InstallConfig) -> Result<(), InstallerError> {
    let swap = format!("{} GiB", config.swap_size_gib);
    let users = if config.users.is_empty() {
        "none".to_string()
    } else {
        config
            .users
            .iter()
            .map(|u| format!("{} ({})", u.name, u.shell))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!();
    ui::print_kv_box(
        "Installation Summary",
        &[
            ("Boot mode", config.boot_mode.display_name()),
            ("CPU", config.cpu_vendor.display_name()),
            ("Disk", config.install_disk.as_str()),
            ("Desktop", config.desktop.display_name()),
            ("Swap", swap.as_str()),
            ("Hostname", config.hostname.as_str()),
            ("Root pass", "********"),
            ("Users", users.as_str()),
        ],
    );
    println!();
    ui::print_warning(&format!(
        "ALL DATA ON {} WILL BE PERMANENTLY ERASED.",
        config.install_disk
    ));
    println!();

    if !console.confirm("Start the installation?", false)? {
        return Err(InstallerError::Cancelled);
    }
    Ok(())
}

// ── Validators ────────────────────────────────────────────────────────────────

fn validate_username(name: &str, existing: &[User]) -> Result<String, String> {
    if name.is_empty() {
        return Err("The username cannot be empty.".to_string());
    }
    if name == "root" {
        return Err("'root' already exists — choose another name.".to_string());
    }
    if existing.iter().any(|u| u.name == name) {
        return Err(format!("User '{}' was already added.", name));
    }

    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if !valid_start || !valid_rest || name.len() > 32 {
        return Err(format!(
            "'{}' is not a valid login name (lowercase letters, digits, '_' or '-').",
            name
        ));
    }

    Ok(name.to_string())
}
