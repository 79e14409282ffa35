use crate::{cmd::Cmd, config::{BootMode, InstallConfig}};

use super::Context;

/// Installed on every system.
const BASE_PACKAGES: &[&str] = &[
    "base",
    "base-devel",
    "linux",
    "linux-firmware",
    "vim",
    "openssh",
    "zsh",
    "fish",
    "git",
    "wget",
    "curl",
    "grub",
    "dhcpcd",
    "net-tools",
    "networkmanager",
];

/// Full package list for `pacstrap`, derived from the configuration.
pub fn package_set(config: &InstallConfig) -> Vec<&'static str> {
    let mut pkgs = BASE_PACKAGES.to_vec();
    pkgs.extend(config.cpu_vendor.microcode_package());
    if config.boot_mode == BootMode::Uefi {
        pkgs.push("efibootmgr");
    }
    pkgs.extend(config.desktop.packages());
    pkgs
}

/// Bootstraps the new system with `pacstrap`.
/// pacstrap shows download progress, so the terminal is handed over.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    vec![Cmd::new("pacstrap")
        .path(ctx.root())
        .args(package_set(ctx.config))
        .streamed()]
}
