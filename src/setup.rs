use std::path::{Path, PathBuf};

use clap::ValueEnum;
use dialoguer::MultiSelect;
use log::info;

use crate::{
    cmd::{Cmd, Shell},
    error::InstallerError,
    steps::{self, Step},
    ui,
};

const ARCHLINUXCN_MIRROR: &str =
    "\n[archlinuxcn]\nServer = https://mirrors.tuna.tsinghua.edu.cn/archlinuxcn/$arch\n";
const AUR_MIRROR: &str = "https://aur.tuna.tsinghua.edu.cn";
const DOCKER_DAEMON_JSON: &str =
    "{\n  \"registry-mirrors\": [\"http://hub-mirror.c.163.com\"]\n}\n";
const FCITX_PROFILE: &str = "export XIM=fcitx
export XIM_PROGRAM=fcitx
export GTK_IM_MODULE=fcitx
export QT_IM_MODULE=fcitx
export XMODIFIERS=\"@im=fcitx\"
";
const GO_PROFILE: &str = "export GOROOT=/usr/lib/go
export GOPATH=$HOME/.go
export GOBIN=$GOPATH/bin
export PATH=$PATH:$GOROOT/bin:$GOBIN
";
/// Home folders created under a Chinese locale and their XDG English names.
const USER_DIRS: [(&str, &str); 8] = [
    ("桌面", "Desktop"),
    ("下载", "Downloads"),
    ("模板", "Templates"),
    ("公共", "Public"),
    ("文档", "Documents"),
    ("音乐", "Music"),
    ("图片", "Pictures"),
    ("视频", "Videos"),
];
const ZSH_PLUGINS: &str =
    "s/^plugins=(git)/plugins=(docker git sudo zsh-syntax-highlighting zsh-autosuggestions)/";

// ── Tasks ─────────────────────────────────────────────────────────────────────

/// Post-install provisioning, run as the regular user on the installed system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetupTask {
    /// The archlinuxcn repository and its keyring
    Archlinuxcn,
    /// yay, pointed at the TUNA AUR mirror
    Aur,
    /// fcitx input method
    InputMethod,
    /// Nerd fonts
    Fonts,
    /// English names for the home folders created under a Chinese locale
    UserDirs,
    /// oh-my-zsh with autosuggestions and syntax highlighting
    OhMyZsh,
    /// Docker with a registry mirror
    Docker,
    /// Go toolchain, GOPATH layout and GoLand
    Golang,
    /// VirtualBox with the Oracle extension pack
    Virtualbox,
    /// Desktop applications
    Apps,
    /// Icon, KDE and GRUB themes
    Themes,
}

impl SetupTask {
    pub const ALL: [SetupTask; 11] = [
        SetupTask::Archlinuxcn,
        SetupTask::Aur,
        SetupTask::InputMethod,
        SetupTask::Fonts,
        SetupTask::UserDirs,
        SetupTask::OhMyZsh,
        SetupTask::Docker,
        SetupTask::Golang,
        SetupTask::Virtualbox,
        SetupTask::Apps,
        SetupTask::Themes,
    ];

    pub fn step(self) -> Step<SetupContext> {
        match self {
            SetupTask::Archlinuxcn => Step { name: "archlinuxcn",  title: "archlinuxcn Repository", plan: archlinuxcn },
            SetupTask::Aur         => Step { name: "aur",          title: "AUR Helper",             plan: aur },
            SetupTask::InputMethod => Step { name: "input-method", title: "Input Method",           plan: input_method },
            SetupTask::Fonts       => Step { name: "fonts",        title: "Fonts",                  plan: fonts },
            SetupTask::UserDirs    => Step { name: "user-dirs",    title: "Home Folder Names",      plan: user_dirs },
            SetupTask::OhMyZsh     => Step { name: "oh-my-zsh",    title: "oh-my-zsh",              plan: oh_my_zsh },
            SetupTask::Docker      => Step { name: "docker",       title: "Docker",                 plan: docker },
            SetupTask::Golang      => Step { name: "golang",       title: "Go Toolchain",           plan: golang },
            SetupTask::Virtualbox  => Step { name: "virtualbox",   title: "VirtualBox",             plan: virtualbox },
            SetupTask::Apps        => Step { name: "apps",         title: "Applications",           plan: apps },
            SetupTask::Themes      => Step { name: "themes",       title: "Themes",                 plan: themes },
        }
    }
}

/// Who the setup runs for.
#[derive(Debug, Clone)]
pub struct SetupContext {
    pub user: String,
    pub home: PathBuf,
}

impl SetupContext {
    pub fn from_env() -> Result<Self, InstallerError> {
        let user = std::env::var("USER").map_err(|_| InstallerError::MissingEnv("USER"))?;
        let home = std::env::var("HOME").map_err(|_| InstallerError::MissingEnv("HOME"))?;
        Ok(SetupContext {
            user,
            home: PathBuf::from(home),
        })
    }

    fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Lets the operator tick the tasks to run when none were given on the command line.
pub fn pick_tasks() -> Result<Vec<SetupTask>, InstallerError> {
    let labels: Vec<String> = SetupTask::ALL
        .iter()
        .map(|t| {
            let value = t.to_possible_value();
            let name = value.as_ref().map(|v| v.get_name()).unwrap_or("");
            let help = value
                .as_ref()
                .and_then(|v| v.get_help())
                .map(ToString::to_string)
                .unwrap_or_default();
            format!("{:<14} {}", name, help)
        })
        .collect();

    ui::print_info("Space toggles a task, Enter confirms.");
    let picked = MultiSelect::new()
        .with_prompt("Tasks to run")
        .items(&labels)
        .interact()?;

    Ok(picked.into_iter().map(|i| SetupTask::ALL[i]).collect())
}

/// Runs `tasks` in canonical order, stopping at the first failure.
pub fn run(
    tasks: &[SetupTask],
    ctx: &SetupContext,
    shell: &mut dyn Shell,
) -> Result<(), InstallerError> {
    if tasks.is_empty() {
        ui::print_warning("No task selected — nothing to do.");
        return Ok(());
    }

    let steps: Vec<Step<SetupContext>> = SetupTask::ALL
        .iter()
        .filter(|t| tasks.contains(t))
        .map(|t| t.step())
        .collect();
    info!("setup tasks for {}: {:?}", ctx.user, tasks);

    // Ask for the sudo password once, before any spinner is on screen.
    shell.run(&Cmd::new("sudo").arg("-v").streamed())?;
    steps::run(&steps, ctx, shell)
}

// ── Command helpers ───────────────────────────────────────────────────────────

fn sudo(program: &str) -> Cmd {
    Cmd::new("sudo").arg(program)
}

fn pacman(pkgs: &[&str]) -> Cmd {
    sudo("pacman")
        .args(["-S", "--needed", "--noconfirm"])
        .args(pkgs.iter().copied())
        .streamed()
}

fn yay(pkgs: &[&str]) -> Cmd {
    Cmd::new("yay")
        .args(["-S", "--needed", "--noconfirm"])
        .args(pkgs.iter().copied())
        .streamed()
}

fn append(file: &Path, text: &str) -> Cmd {
    Cmd::new("tee").arg("-a").path(file).stdin(text)
}

// ── Plans ─────────────────────────────────────────────────────────────────────

fn archlinuxcn(_: &SetupContext) -> Vec<Cmd> {
    vec![
        sudo("sed").args(["-i", "-e", "s/^#Color/Color/", "/etc/pacman.conf"]),
        sudo("tee")
            .args(["-a", "/etc/pacman.conf"])
            .stdin(ARCHLINUXCN_MIRROR),
        sudo("pacman").args(["-Syu", "--noconfirm"]).streamed(),
        pacman(&["archlinuxcn-keyring"]),
    ]
}

fn aur(_: &SetupContext) -> Vec<Cmd> {
    vec![
        pacman(&["yay"]),
        Cmd::new("yay").args(["--aururl", AUR_MIRROR, "--save"]),
    ]
}

fn input_method(ctx: &SetupContext) -> Vec<Cmd> {
    vec![
        pacman(&["fcitx", "fcitx-table-other", "kcm-fcitx", "fcitx-skin-material"]),
        append(&ctx.home_path(".xprofile"), FCITX_PROFILE),
    ]
}

fn fonts(_: &SetupContext) -> Vec<Cmd> {
    vec![pacman(&["nerd-fonts"])]
}

/// Renames each localized folder that exists and points `user-dirs.dirs` at
/// the new names. Folders that are missing are left alone.
fn user_dirs(ctx: &SetupContext) -> Vec<Cmd> {
    let mut cmds: Vec<Cmd> = USER_DIRS
        .iter()
        .map(|(local, english)| {
            Cmd::new("mv")
                .args(["-n", "-T"])
                .path(&ctx.home_path(local))
                .path(&ctx.home_path(english))
                .allow_failure()
        })
        .collect();

    let mut sed = Cmd::new("sed").arg("-i");
    for (local, english) in USER_DIRS {
        sed = sed.arg("-e").arg(format!("s|/{}\"|/{}\"|", local, english));
    }
    cmds.push(sed.path(&ctx.home_path(".config/user-dirs.dirs")));
    cmds
}

fn oh_my_zsh(ctx: &SetupContext) -> Vec<Cmd> {
    let omz = ctx.home_path(".oh-my-zsh");
    let plugins = omz.join("custom/plugins");
    let zshrc = ctx.home_path(".zshrc");

    let clone = |url: &str, dest: &Path| {
        Cmd::new("git")
            .args(["clone", "--depth", "1", url])
            .path(dest)
    };

    vec![
        clone("https://github.com/ohmyzsh/ohmyzsh.git", &omz),
        clone(
            "https://github.com/zsh-users/zsh-autosuggestions.git",
            &plugins.join("zsh-autosuggestions"),
        ),
        clone(
            "https://github.com/zsh-users/zsh-syntax-highlighting.git",
            &plugins.join("zsh-syntax-highlighting"),
        ),
        Cmd::new("cp")
            .path(&omz.join("templates/zshrc.zsh-template"))
            .path(&zshrc),
        Cmd::new("sed").args(["-i", "-e", ZSH_PLUGINS]).path(&zshrc),
    ]
}

fn docker(ctx: &SetupContext) -> Vec<Cmd> {
    vec![
        pacman(&["docker"]),
        sudo("gpasswd").args(["-a", ctx.user.as_str(), "docker"]),
        sudo("mkdir").args(["-p", "/etc/docker"]),
        sudo("tee")
            .arg("/etc/docker/daemon.json")
            .stdin(DOCKER_DAEMON_JSON),
        sudo("systemctl").args(["enable", "docker"]),
    ]
}

fn golang(ctx: &SetupContext) -> Vec<Cmd> {
    let gopath = ctx.home_path(".go");
    vec![
        pacman(&["go"]),
        Cmd::new("mkdir")
            .arg("-p")
            .path(&gopath.join("bin"))
            .path(&gopath.join("src"))
            .path(&gopath.join("pkg")),
        append(&ctx.home_path(".xprofile"), GO_PROFILE),
        Cmd::new("go").args(["env", "-w", "GOPROXY=https://goproxy.io,direct"]),
        pacman(&["goland-jre", "goland"]),
    ]
}

fn virtualbox(_: &SetupContext) -> Vec<Cmd> {
    // virtualbox-ext-oracle comes from archlinuxcn
    vec![pacman(&[
        "virtualbox",
        "virtualbox-ext-oracle",
        "virtualbox-guest-iso",
        "net-tools",
    ])]
}

fn apps(_: &SetupContext) -> Vec<Cmd> {
    vec![
        pacman(&["telegram-desktop", "typora"]),
        yay(&["google-chrome", "visual-studio-code-bin", "qqmusic-bin"]),
    ]
}

fn themes(_: &SetupContext) -> Vec<Cmd> {
    vec![
        pacman(&["papirus-icon-theme"]),
        yay(&["layan-kde-git", "grub-theme-tela-color-2k-git"]),
    ]
}
