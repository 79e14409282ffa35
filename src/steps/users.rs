use crate::cmd::Cmd;

use super::Context;

/// Uncomments the `%wheel ALL=(ALL…) ALL` rule in `/etc/sudoers`.
const ENABLE_WHEEL: &str = r"s/^# \(%wheel ALL=(ALL\(:ALL\)\?) ALL\)/\1/";

/// Root password, regular accounts and sudo access for the `wheel` group.
///
/// Passwords go to `chpasswd` on stdin only.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    let config = ctx.config;
    let mut cmds = vec![set_password(ctx, "root", config.root_password.expose())];

    for user in &config.users {
        cmds.push(
            ctx.chroot("useradd")
                .args(["-m", "-G", "wheel", "-s"])
                .arg(user.shell.path())
                .arg(&user.name),
        );
        cmds.push(set_password(ctx, &user.name, user.password.expose()));
    }

    cmds.push(ctx.chroot("sed").args(["-i", "-e", ENABLE_WHEEL, "/etc/sudoers"]));
    cmds
}

fn set_password(ctx: &Context, user: &str, password: &str) -> Cmd {
    ctx.chroot("chpasswd").stdin(format!("{}:{}\n", user, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{BootMode, Desktop},
        steps::fixtures,
    };

    #[test]
    fn creates_account_with_chosen_shell() {
        let config = fixtures::config(BootMode::Uefi, Desktop::None);
        let settings = fixtures::settings();
        let cmds = plan(&Context { config: &config, settings: &settings });
        let lines: Vec<String> = cmds.iter().map(ToString::to_string).collect();
        let sudoers = format!("arch-chroot /mnt sed -i -e {} /etc/sudoers", ENABLE_WHEEL);

        assert_eq!(
            lines,
            [
                "arch-chroot /mnt chpasswd < <stdin>",
                "arch-chroot /mnt useradd -m -G wheel -s /bin/zsh alice",
                "arch-chroot /mnt chpasswd < <stdin>",
                sudoers.as_str(),
            ]
        );
        assert_eq!(cmds[0].input(), Some("root:toor\n"));
        assert_eq!(cmds[2].input(), Some("alice:s3cret\n"));
    }

    #[test]
    fn zero_users_still_sets_root_password() {
        let mut config = fixtures::config(BootMode::Uefi, Desktop::None);
        config.users.clear();
        let settings = fixtures::settings();
        let cmds = plan(&Context { config: &config, settings: &settings });

        assert_eq!(cmds[0].input(), Some("root:toor\n"));
        assert!(!cmds.iter().any(|c| c.arguments().iter().any(|a| a == "useradd")));
    }

    #[test]
    fn passwords_never_appear_in_arguments() {
        let config = fixtures::config(BootMode::Uefi, Desktop::None);
        let settings = fixtures::settings();
        for cmd in plan(&Context { config: &config, settings: &settings }) {
            assert!(!cmd.to_string().contains("toor"));
            assert!(!cmd.to_string().contains("s3cret"));
        }
    }
}
