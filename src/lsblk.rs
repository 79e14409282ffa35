use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{cmd, error::InstallerError};

/// Name fragments of devices that are never an install target:
/// loop devices, optical drives, ram/zram disks and the live medium's root.
const EXCLUDED_MARKERS: [&str; 4] = ["loop", "rom", "ram", "airoot"];

/// Where archiso mounts the medium it booted from.
const LIVE_MEDIUM_MOUNT: &str = "/run/archiso";

// ── Data types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    pub path: String,  // /dev/sda
    pub size: String,  // 20G
    pub model: String, // SAMSUNG SSD 870
}

impl Disk {
    /// One-line label shown in the disk list.
    pub fn display(&self) -> String {
        format!("{:<14}  {:>8}   {}", self.path, self.size, self.model)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Returns every real block device that can hold the new system.
/// An empty result is [`InstallerError::NoDiskFound`].
pub fn list_disks() -> Result<Vec<Disk>, InstallerError> {
    let output = cmd::capture(
        "lsblk",
        &["--pairs", "--output", "NAME,SIZE,TYPE,MODEL,PKNAME,MOUNTPOINTS"],
    )?;

    let disks = real_disks(&output);
    debug!("discovered disks: {:?}", disks);

    if disks.is_empty() {
        return Err(InstallerError::NoDiskFound);
    }
    Ok(disks)
}

/// Whole disks from a full `lsblk --pairs` listing (partitions included),
/// minus excluded devices and the disk the live system booted from.
fn real_disks(listing: &str) -> Vec<Disk> {
    let rows: Vec<HashMap<String, String>> = listing.lines().map(parse_pairs).collect();
    let live = live_medium(&rows);

    rows.iter()
        .filter_map(|m| {
            if field(m, "TYPE") != "disk" {
                return None;
            }
            let name = field(m, "NAME").trim_start_matches("/dev/");
            let path = format!("/dev/{}", name);
            if name.is_empty() || is_excluded(&path) || live.contains(name) {
                return None;
            }
            Some(Disk {
                path,
                size: m.get("SIZE").cloned().unwrap_or_default(),
                model: {
                    let s = m.get("MODEL").cloned().unwrap_or_default();
                    if s.trim().is_empty() { "—".to_string() } else { s.trim().to_string() }
                },
            })
        })
        .collect()
}

/// Names of the devices mounted under [`LIVE_MEDIUM_MOUNT`] and of their parent disks.
fn live_medium(rows: &[HashMap<String, String>]) -> HashSet<&str> {
    rows.iter()
        .filter(|m| field(m, "MOUNTPOINTS").contains(LIVE_MEDIUM_MOUNT))
        .flat_map(|m| [field(m, "NAME"), field(m, "PKNAME")])
        .map(|name| name.trim_start_matches("/dev/"))
        .filter(|name| !name.is_empty())
        .collect()
}

fn field<'a>(row: &'a HashMap<String, String>, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

fn is_excluded(path: &str) -> bool {
    EXCLUDED_MARKERS.iter().any(|marker| path.contains(marker))
}

// ── lsblk --pairs parser ──────────────────────────────────────────────────────
//
// Each line looks like:   NAME="sda" SIZE="20G" TYPE="disk" MODEL="VBOX HARDDISK"

fn parse_pairs(line: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut rest = line.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].split_whitespace().last().unwrap_or("").to_string();
        rest = &rest[eq + 1..];

        if !rest.starts_with('"') {
            break;
        }
        rest = &rest[1..];

        let Some(close) = rest.find('"') else { break };
        let value = rest[..close].to_string();
        rest = &rest[close + 1..];

        if !key.is_empty() {
            map.insert(key, value);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"NAME="loop0" SIZE="673.1M" TYPE="loop" MODEL=""
NAME="sda" SIZE="20G" TYPE="disk" MODEL="VBOX HARDDISK"
NAME="sr0" SIZE="812M" TYPE="rom" MODEL="VBOX CD-ROM"
NAME="zram0" SIZE="3.8G" TYPE="disk" MODEL=""
NAME="nvme0n1" SIZE="476.9G" TYPE="disk" MODEL="Samsung SSD 970"
NAME="airootfs" SIZE="256M" TYPE="disk" MODEL=""
NAME="ram0" SIZE="16M" TYPE="disk" MODEL=""
NAME="romdisk" SIZE="1G" TYPE="disk" MODEL=""
"#;

    #[test]
    fn keeps_only_real_disks() {
        let disks = real_disks(LISTING);
        let paths: Vec<&str> = disks.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["/dev/sda", "/dev/nvme0n1"]);
        assert_eq!(disks[0].model, "VBOX HARDDISK");
        assert_eq!(disks[1].size, "476.9G");
    }

    #[test]
    fn every_marker_is_excluded() {
        for marker in EXCLUDED_MARKERS {
            let line = format!(r#"NAME="x{}1" SIZE="1G" TYPE="disk" MODEL="M""#, marker);
            assert!(real_disks(&line).is_empty(), "{} not excluded", marker);
        }
    }

    #[test]
    fn boot_medium_is_not_offered() {
        let listing = r#"NAME="loop0" SIZE="846.1M" TYPE="loop" MODEL="" PKNAME="" MOUNTPOINTS="/run/archiso/airootfs"
NAME="sda" SIZE="20G" TYPE="disk" MODEL="VBOX HARDDISK" PKNAME="" MOUNTPOINTS=""
NAME="sdb" SIZE="14.9G" TYPE="disk" MODEL="Cruzer Blade" PKNAME="" MOUNTPOINTS=""
NAME="sdb1" SIZE="1G" TYPE="part" MODEL="" PKNAME="sdb" MOUNTPOINTS="/run/archiso/bootmnt"
NAME="sdb2" SIZE="15M" TYPE="part" MODEL="" PKNAME="sdb" MOUNTPOINTS=""
NAME="sdc" SIZE="64G" TYPE="disk" MODEL="Data" PKNAME="" MOUNTPOINTS=""
NAME="sdc1" SIZE="64G" TYPE="part" MODEL="" PKNAME="sdc" MOUNTPOINTS="/media/data"
"#;
        let paths: Vec<String> = real_disks(listing).into_iter().map(|d| d.path).collect();
        assert_eq!(paths, ["/dev/sda", "/dev/sdc"]);
    }

    #[test]
    fn missing_model_gets_placeholder() {
        let disks = real_disks(r#"NAME="vda" SIZE="8G" TYPE="disk" MODEL="""#);
        assert_eq!(disks[0].model, "—");
    }

    #[test]
    fn parses_values_with_spaces() {
        let m = parse_pairs(r#"NAME="sda" MODEL="WDC WD10EZEX-08W" TYPE="disk""#);
        assert_eq!(m["MODEL"], "WDC WD10EZEX-08W");
        assert_eq!(m["TYPE"], "disk");
    }
}
