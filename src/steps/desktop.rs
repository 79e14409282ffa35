use crate::cmd::Cmd;

use super::Context;

/// Enables the display manager; nothing to do without a desktop.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    ctx.config
        .desktop
        .display_manager()
        .map(|dm| ctx.chroot("systemctl").args(["enable", dm]))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{BootMode, Desktop},
        steps::fixtures,
    };

    fn lines(desktop: Desktop) -> Vec<String> {
        let config = fixtures::config(BootMode::Uefi, desktop);
        let settings = fixtures::settings();
        plan(&Context { config: &config, settings: &settings })
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn no_desktop_runs_nothing() {
        assert!(lines(Desktop::None).is_empty());
    }

    #[test]
    fn each_desktop_enables_its_display_manager() {
        assert_eq!(lines(Desktop::Gnome), ["arch-chroot /mnt systemctl enable gdm"]);
        assert_eq!(lines(Desktop::Plasma), ["arch-chroot /mnt systemctl enable sddm"]);
    }
}
