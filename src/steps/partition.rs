use std::fmt::Write;

use crate::{cmd::Cmd, config::BootMode};

use super::Context;

/// Size of the EFI system partition (UEFI) or `/boot` partition (BIOS).
pub const BOOT_SIZE_MIB: u64 = 512;

// ── Partition plan ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Gpt,
    Mbr,
}

impl TableKind {
    fn sfdisk_label(self) -> &'static str {
        match self {
            TableKind::Gpt => "gpt",
            TableKind::Mbr => "dos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Efi,
    Boot,
    Swap,
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    MiB(u64),
    GiB(u32),
    Remainder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSpec {
    pub role: Role,
    pub size: Size,
}

/// Partition layout derived from the boot mode and swap size.
///
/// Always three partitions, in this order: boot (EFI on UEFI), swap, root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    pub table: TableKind,
    pub partitions: Vec<PartitionSpec>,
}

impl PartitionPlan {
    pub fn new(boot_mode: BootMode, swap_size_gib: u32) -> Self {
        let (table, boot_role) = match boot_mode {
            BootMode::Uefi => (TableKind::Gpt, Role::Efi),
            BootMode::Bios => (TableKind::Mbr, Role::Boot),
        };

        PartitionPlan {
            table,
            partitions: vec![
                PartitionSpec { role: boot_role, size: Size::MiB(BOOT_SIZE_MIB) },
                PartitionSpec { role: Role::Swap, size: Size::GiB(swap_size_gib) },
                PartitionSpec { role: Role::Root, size: Size::Remainder },
            ],
        }
    }

    /// Input script for `sfdisk`, one line per partition.
    pub fn sfdisk_script(&self) -> String {
        let mut script = format!("label: {}\n", self.table.sfdisk_label());

        for part in &self.partitions {
            let mut fields = Vec::new();
            match part.size {
                Size::MiB(n) => fields.push(format!("size={}MiB", n)),
                Size::GiB(n) => fields.push(format!("size={}GiB", n)),
                Size::Remainder => {}
            }
            fields.push(
                match part.role {
                    Role::Efi => "type=U",
                    Role::Swap => "type=S",
                    Role::Boot | Role::Root => "type=L",
                }
                .to_string(),
            );
            if part.role == Role::Boot {
                fields.push("bootable".to_string());
            }
            let _ = writeln!(script, "{}", fields.join(", "));
        }

        script
    }
}

/// `/dev/sda` + 1 → `/dev/sda1`, `/dev/nvme0n1` + 1 → `/dev/nvme0n1p1`.
pub fn part_path(disk: &str, index: usize) -> String {
    if disk.ends_with(|c: char| c.is_ascii_digit()) {
        format!("{}p{}", disk, index)
    } else {
        format!("{}{}", disk, index)
    }
}

// ── Step ──────────────────────────────────────────────────────────────────────

/// Partition, format, mount and enable swap on the target disk.
///
/// Mount order:
///   1. Root  → R
///   2. Create R/boot (R/boot/EFI on UEFI)
///   3. Boot  → that directory
///   4. Swap  → swapon
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    let config = ctx.config;
    let disk = config.install_disk.as_str();
    let layout = PartitionPlan::new(config.boot_mode, config.swap_size_gib);

    let boot = part_path(disk, 1);
    let swap = part_path(disk, 2);
    let root = part_path(disk, 3);
    let boot_dir = match config.boot_mode {
        BootMode::Uefi => ctx.in_root("boot/EFI"),
        BootMode::Bios => ctx.in_root("boot"),
    };
    let format_boot = match config.boot_mode {
        BootMode::Uefi => Cmd::new("mkfs.fat").args(["-F", "32"]).arg(&boot),
        BootMode::Bios => Cmd::new("mkfs.ext2").arg("-F").arg(&boot),
    };

    vec![
        // Leftovers from an earlier attempt would keep the kernel from
        // re-reading the partition table.
        Cmd::new("umount").arg("-R").path(ctx.root()).allow_failure(),
        Cmd::new("swapoff").arg(&swap).allow_failure(),
        Cmd::new("sfdisk")
            .args(["--wipe", "always", "--wipe-partitions", "always"])
            .arg(disk)
            .stdin(layout.sfdisk_script()),
        format_boot,
        Cmd::new("mkswap").arg(&swap),
        Cmd::new("mkfs.ext4").arg("-F").arg(&root),
        Cmd::new("mount").arg(&root).path(ctx.root()),
        Cmd::new("mkdir").arg("-p").path(&boot_dir),
        Cmd::new("mount").arg(&boot).path(&boot_dir),
        Cmd::new("swapon").arg(&swap),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Desktop,
        steps::{fixtures, Context},
    };

    #[test]
    fn uefi_plan_is_efi_swap_root() {
        let plan = PartitionPlan::new(BootMode::Uefi, 4);

        assert_eq!(plan.table, TableKind::Gpt);
        assert_eq!(plan.partitions.len(), 3);
        assert_eq!(plan.partitions[0].role, Role::Efi);
        assert!(matches!(plan.partitions[0].size, Size::MiB(n) if n >= 512));
        assert_eq!(plan.partitions[1], PartitionSpec { role: Role::Swap, size: Size::GiB(4) });
        assert_eq!(plan.partitions[2], PartitionSpec { role: Role::Root, size: Size::Remainder });
        assert_eq!(
            plan.sfdisk_script(),
            "label: gpt\nsize=512MiB, type=U\nsize=4GiB, type=S\ntype=L\n"
        );
    }

    #[test]
    fn bios_plan_has_no_efi_marker() {
        let plan = PartitionPlan::new(BootMode::Bios, 4);
        let script = plan.sfdisk_script();

        assert_eq!(plan.table, TableKind::Mbr);
        assert_eq!(plan.partitions.len(), 3);
        let roles: Vec<Role> = plan.partitions.iter().map(|p| p.role).collect();
        assert_eq!(roles, [Role::Boot, Role::Swap, Role::Root]);
        assert!(!script.contains("type=U"));
        assert!(script.starts_with("label: dos\n"));
        assert!(script.contains("size=512MiB, type=L, bootable"));
    }

    #[test]
    fn nvme_partitions_get_p_infix() {
        assert_eq!(part_path("/dev/sda", 3), "/dev/sda3");
        assert_eq!(part_path("/dev/nvme0n1", 1), "/dev/nvme0n1p1");
        assert_eq!(part_path("/dev/mmcblk0", 2), "/dev/mmcblk0p2");
    }

    #[test]
    fn uefi_step_formats_fat_and_mounts_efi_dir() {
        let config = fixtures::config(BootMode::Uefi, Desktop::None);
        let settings = fixtures::settings();
        let lines: Vec<String> = plan(&Context { config: &config, settings: &settings })
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            lines,
            [
                "umount -R /mnt",
                "swapoff /dev/sda2",
                "sfdisk --wipe always --wipe-partitions always /dev/sda < <stdin>",
                "mkfs.fat -F 32 /dev/sda1",
                "mkswap /dev/sda2",
                "mkfs.ext4 -F /dev/sda3",
                "mount /dev/sda3 /mnt",
                "mkdir -p /mnt/boot/EFI",
                "mount /dev/sda1 /mnt/boot/EFI",
                "swapon /dev/sda2",
            ]
        );
    }

    #[test]
    fn bios_step_uses_ext2_boot() {
        let config = fixtures::config(BootMode::Bios, Desktop::None);
        let settings = fixtures::settings();
        let cmds = plan(&Context { config: &config, settings: &settings });

        assert!(cmds[0].allows_failure());
        assert!(cmds.iter().any(|c| c.to_string() == "mkfs.ext2 -F /dev/sda1"));
        assert!(cmds.iter().any(|c| c.to_string() == "mount /dev/sda1 /mnt/boot"));
        assert!(cmds[2].input().is_some_and(|s| s.starts_with("label: dos")));
    }
}
