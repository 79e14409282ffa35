use crate::cmd::Cmd;

use super::Context;

/// Writes `/etc/hostname` and a minimal `/etc/hosts` in the new system.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    let host = &ctx.config.hostname;
    vec![
        ctx.chroot("tee").arg("/etc/hostname").stdin(format!("{}\n", host)),
        ctx.chroot("tee").arg("/etc/hosts").stdin(hosts_file(host)),
    ]
}

fn hosts_file(host: &str) -> String {
    format!(
        "127.0.0.1\tlocalhost\n::1\t\tlocalhost\n127.0.1.1\t{host}.localdomain\t{host}\n"
    )
}
