use crate::cmd::Cmd;

use super::Context;

/// Enables SSH in the new system and unmounts it.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    vec![
        ctx.chroot("systemctl").args(["enable", "sshd"]),
        Cmd::new("umount").arg("-R").path(ctx.root()),
    ]
}
