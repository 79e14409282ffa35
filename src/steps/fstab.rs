use crate::cmd::Cmd;

use super::Context;

/// Generates `R/etc/fstab` from what is mounted under R, using UUIDs.
///
/// Equivalent to: `genfstab -U /mnt >> /mnt/etc/fstab`
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    vec![
        // pacstrap creates R/etc, but guard just in case.
        Cmd::new("mkdir").arg("-p").path(&ctx.in_root("etc")),
        Cmd::new("genfstab")
            .arg("-U")
            .path(ctx.root())
            .append_to(&ctx.in_root("etc/fstab")),
    ]
}
