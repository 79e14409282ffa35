use crate::{cmd::Cmd, config::BootMode};

use super::Context;

/// GRUB, registered with the firmware on UEFI or written to the disk's MBR on BIOS.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    let install = match ctx.config.boot_mode {
        BootMode::Uefi => ctx.chroot("grub-install").args([
            "--target=x86_64-efi",
            "--efi-directory=/boot/EFI",
            "--bootloader-id=GRUB",
        ]),
        BootMode::Bios => ctx
            .chroot("grub-install")
            .arg("--target=i386-pc")
            .arg(&ctx.config.install_disk),
    };

    vec![
        install,
        ctx.chroot("grub-mkconfig").args(["-o", "/boot/grub/grub.cfg"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Desktop, steps::fixtures};

    fn lines(mode: BootMode) -> Vec<String> {
        let config = fixtures::config(mode, Desktop::None);
        let settings = fixtures::settings();
        plan(&Context { config: &config, settings: &settings })
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn uefi_installs_against_efi_directory() {
        assert_eq!(
            lines(BootMode::Uefi),
            [
                "arch-chroot /mnt grub-install --target=x86_64-efi --efi-directory=/boot/EFI --bootloader-id=GRUB",
                "arch-chroot /mnt grub-mkconfig -o /boot/grub/grub.cfg",
            ]
        );
    }

    #[test]
    fn bios_installs_to_whole_disk() {
        let lines = lines(BootMode::Bios);
        assert_eq!(lines[0], "arch-chroot /mnt grub-install --target=i386-pc /dev/sda");
        assert_eq!(lines[1], "arch-chroot /mnt grub-mkconfig -o /boot/grub/grub.cfg");
    }
}
