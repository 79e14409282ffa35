use std::{fmt, path::PathBuf};

// ── Host-derived choices ──────────────────────────────────────────────────────

/// Firmware interface the live system booted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Uefi,
    Bios,
}

impl BootMode {
    pub fn display_name(self) -> &'static str {
        match self {
            BootMode::Uefi => "UEFI",
            BootMode::Bios => "BIOS/Legacy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVendor {
    Intel,
    Amd,
    Other,
}

impl CpuVendor {
    pub const ALL: [CpuVendor; 3] = [CpuVendor::Intel, CpuVendor::Amd, CpuVendor::Other];

    /// Microcode package for this vendor, if one exists.
    pub fn microcode_package(self) -> Option<&'static str> {
        match self {
            CpuVendor::Intel => Some("intel-ucode"),
            CpuVendor::Amd => Some("amd-ucode"),
            CpuVendor::Other => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CpuVendor::Intel => "Intel",
            CpuVendor::Amd => "AMD",
            CpuVendor::Other => "other",
        }
    }
}

impl fmt::Display for CpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── Operator choices ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desktop {
    None,
    Gnome,
    Plasma,
}

impl Desktop {
    pub const ALL: [Desktop; 3] = [Desktop::None, Desktop::Gnome, Desktop::Plasma];

    /// Packages shared by every graphical desktop.
    const COMMON_PACKAGES: &'static [&'static str] = &[
        "xorg",
        "alsa-utils",
        "pulseaudio",
        "pulseaudio-alsa",
        "xf86-input-synaptics",
        "ttf-dejavu",
        "wqy-microhei",
    ];

    /// Everything `pacstrap` needs for this desktop; empty for [`Desktop::None`].
    pub fn packages(self) -> Vec<&'static str> {
        let specific: &[&str] = match self {
            Desktop::None => return Vec::new(),
            Desktop::Gnome => &["gdm", "gnome", "gnome-extra"],
            Desktop::Plasma => &[
                "sddm",
                "plasma",
                "kde-applications",
                "libdbusmenu-glib",
                "appmenu-gtk-module",
                "packagekit-qt5",
            ],
        };
        Self::COMMON_PACKAGES
            .iter()
            .chain(specific)
            .copied()
            .collect()
    }

    /// The display-manager service to enable.
    pub fn display_manager(self) -> Option<&'static str> {
        match self {
            Desktop::None => None,
            Desktop::Gnome => Some("gdm"),
            Desktop::Plasma => Some("sddm"),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Desktop::None => "No desktop (console only)",
            Desktop::Gnome => "GNOME",
            Desktop::Plasma => "KDE Plasma",
        }
    }
}

impl fmt::Display for Desktop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Login shells a new account may use. All of them are in the base package set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginShell {
    Bash,
    Zsh,
    Fish,
}

impl LoginShell {
    pub const ALL: [LoginShell; 3] = [LoginShell::Bash, LoginShell::Zsh, LoginShell::Fish];

    pub fn name(self) -> &'static str {
        match self {
            LoginShell::Bash => "bash",
            LoginShell::Zsh => "zsh",
            LoginShell::Fish => "fish",
        }
    }

    pub fn path(self) -> String {
        format!("/bin/{}", self.name())
    }
}

impl fmt::Display for LoginShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Secrets ───────────────────────────────────────────────────────────────────

/// A password held in memory for the duration of the run.
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub password: Secret,
    pub shell: LoginShell,
}

// ── Install configuration ─────────────────────────────────────────────────────

/// Everything collected from the host and the operator.
/// Built once by the collector, never modified afterwards.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub boot_mode: BootMode,
    pub cpu_vendor: CpuVendor,
    pub install_disk: String,
    pub desktop: Desktop,
    pub swap_size_gib: u32,
    pub hostname: String,
    pub root_password: Secret,
    pub users: Vec<User>,
}

/// Values fixed on the command line rather than asked interactively.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the new root filesystem is mounted during installation.
    pub mount_root: PathBuf,
    pub timezone: String,
    /// Locales enabled in `/etc/locale.gen`; the first one becomes `LANG`.
    pub locales: Vec<String>,
}

impl Settings {
    pub fn lang(&self) -> &str {
        self.locales
            .first()
            .map(String::as_str)
            .unwrap_or("en_US.UTF-8")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mount_root: PathBuf::from("/mnt"),
            timezone: "Asia/Shanghai".to_string(),
            locales: vec!["en_US.UTF-8".to_string(), "zh_CN.UTF-8".to_string()],
        }
    }
}
