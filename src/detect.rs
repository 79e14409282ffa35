use std::path::Path;

use log::{debug, info};

use crate::{
    cmd,
    config::{BootMode, CpuVendor},
    error::InstallerError,
    ui,
};

const EFIVARS: &str = "/sys/firmware/efi/efivars";
const CPUINFO: &str = "/proc/cpuinfo";

// ── Boot mode ─────────────────────────────────────────────────────────────────

/// Detects whether the live system booted in UEFI or BIOS/Legacy mode
/// by checking the presence of `/sys/firmware/efi/efivars`.
pub fn boot_mode() -> BootMode {
    let mode = boot_mode_at(Path::new(EFIVARS));

    match mode {
        BootMode::Uefi => ui::print_success("UEFI mode detected — EFI system partition required."),
        BootMode::Bios => ui::print_warning("BIOS/Legacy mode detected — no EFI variables found."),
    }
    info!("boot mode: {:?}", mode);

    mode
}

fn boot_mode_at(efivars: &Path) -> BootMode {
    if efivars.exists() {
        BootMode::Uefi
    } else {
        BootMode::Bios
    }
}

// ── CPU vendor ────────────────────────────────────────────────────────────────

/// Reads the CPU vendor from `/proc/cpuinfo`. Unreadable means [`CpuVendor::Other`].
pub fn cpu_vendor() -> CpuVendor {
    let vendor = std::fs::read_to_string(CPUINFO)
        .map(|info| parse_cpu_vendor(&info))
        .unwrap_or(CpuVendor::Other);
    info!("cpu vendor: {:?}", vendor);
    vendor
}

fn parse_cpu_vendor(cpuinfo: &str) -> CpuVendor {
    let id = cpuinfo
        .lines()
        .find(|l| l.starts_with("vendor_id"))
        .and_then(|l| l.split(':').nth(1))
        .map(str::trim)
        .unwrap_or("");

    match id {
        "GenuineIntel" => CpuVendor::Intel,
        "AuthenticAMD" => CpuVendor::Amd,
        _ => CpuVendor::Other,
    }
}

// ── Pre-flight checks ─────────────────────────────────────────────────────────

/// Checks that the process is running as root (UID 0).
pub fn check_root() -> Result<(), InstallerError> {
    let uid = std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|s| {
            s.lines()
                .find(|l| l.starts_with("Uid:"))
                .and_then(|l| l.split_whitespace().nth(1))
                .and_then(|v| v.parse::<u32>().ok())
        })
        .unwrap_or(1); // default to non-root if unreadable

    if uid != 0 {
        return Err(InstallerError::NotRoot);
    }

    Ok(())
}

/// One ping to the Arch mirror host; package downloads need it.
pub fn check_network() -> Result<(), InstallerError> {
    let pb = ui::spinner("Checking network connection…");
    let online = cmd::succeeds("ping", &["-c", "1", "-W", "3", "archlinux.org"]);
    pb.finish_and_clear();
    debug!("network reachable: {}", online);

    if !online {
        return Err(InstallerError::NoNetwork);
    }
    ui::print_success("Network connection available.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_efivars_means_bios() {
        assert_eq!(
            boot_mode_at(Path::new("/nonexistent/firmware/efi/efivars")),
            BootMode::Bios
        );
        assert_eq!(boot_mode_at(&std::env::temp_dir()), BootMode::Uefi);
    }

    #[test]
    fn vendor_strings_map_to_known_vendors() {
        let intel = "processor\t: 0\nvendor_id\t: GenuineIntel\ncpu family\t: 6\n";
        let amd = "processor\t: 0\nvendor_id\t: AuthenticAMD\n";
        let arm = "processor\t: 0\nBogoMIPS\t: 48.00\nCPU implementer\t: 0x41\n";

        assert_eq!(parse_cpu_vendor(intel), CpuVendor::Intel);
        assert_eq!(parse_cpu_vendor(amd), CpuVendor::Amd);
        assert_eq!(parse_cpu_vendor(arm), CpuVendor::Other);
        assert_eq!(parse_cpu_vendor(""), CpuVendor::Other);
    }
}
