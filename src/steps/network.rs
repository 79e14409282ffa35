use crate::cmd::Cmd;

use super::Context;

/// Enables the network services installed with the base system.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    ["dhcpcd", "NetworkManager"]
        .into_iter()
        .map(|service| ctx.chroot("systemctl").args(["enable", service]))
        .collect()
}
