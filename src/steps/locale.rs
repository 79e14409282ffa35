use crate::cmd::Cmd;

use super::Context;

/// Timezone, hardware clock and locales inside the new system.
pub fn plan(ctx: &Context) -> Vec<Cmd> {
    let settings = ctx.settings;
    let mut cmds = vec![
        ctx.chroot("ln").args([
            "-sf".to_string(),
            format!("/usr/share/zoneinfo/{}", settings.timezone),
            "/etc/localtime".to_string(),
        ]),
        ctx.chroot("hwclock").arg("--systohc"),
    ];

    for locale in &settings.locales {
        cmds.push(ctx.chroot("sed").args([
            "-i".to_string(),
            "-e".to_string(),
            uncomment_locale(locale),
            "/etc/locale.gen".to_string(),
        ]));
    }

    cmds.push(ctx.chroot("locale-gen"));
    cmds.push(
        ctx.chroot("tee")
            .arg("/etc/locale.conf")
            .stdin(format!("LANG={}\n", settings.lang())),
    );
    cmds
}

/// sed expression turning `#en_US.UTF-8 UTF-8` into `en_US.UTF-8 UTF-8`.
fn uncomment_locale(locale: &str) -> String {
    let charset = locale.rsplit('.').next().unwrap_or("UTF-8");
    let escaped = locale.replace('.', "\\.");
    format!("s/^#{} {}/{} {}/", escaped, charset, locale, charset)
}
