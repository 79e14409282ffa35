use crate::cmd::Cmd;

use super::Context;

/// Turns on NTP for the live system.
/// A wrong clock makes pacman reject package signatures.
pub fn plan(_ctx: &Context) -> Vec<Cmd> {
    vec![Cmd::new("timedatectl").args(["set-ntp", "true"])]
}
