//! Full workstation setup: directories, dotfiles, packages, desktop
//! settings, and cleanup. The longest pipeline, and the reason the label
//! queue exists.

use crate::context::Context;
use crate::fsops;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, CommandTemplate, RunOptions, Verdict};
use anyhow::Result;

const LABELS: &str = r#"
    System initialization
    Creating new directories
    Copying files
    Adjusting file permissions
    Setting terminal profile
    Installing developer tools
    Installing seahorse nautilus
    Installing zsh
    Setting Text Editor profile
    Installing python pip3
    Installing python venv
    Creating virtual environment (env)
    Installing Google Chrome
    Setting up jupyter notebooks
    Refreshing snaps (please be patient)
    Configuring favorites
    Disabling auto screen lock
    Setting idle timeout to "never"
    Disabling auto updates
    Patching fuse.conf
    Tidying icons
    Cleaning up"#;

/// Baseline ppa packages. The nss/pcsc entries support certificate fixes
/// on the mission network and can go away for other sites.
const DEVELOPER_TOOLS: &[&str] = &[
    "gnome-text-editor",
    "build-essential",
    "libnss3-tools",
    "pcscd",
    "pcsc-tools",
    "ccache",
    "vim",
    "tree",
];

const FAVORITE_APPS: &[&str] = &[
    "google-chrome.desktop",
    "org.gnome.TextEditor.desktop",
    "org.gnome.Terminal.desktop",
    "org.gnome.Nautilus.desktop",
    "org.gnome.Calculator.desktop",
    "gnome-control-center.desktop",
    "snap-store_ubuntu-software.desktop",
    "org.gnome.seahorse.Application.desktop",
];

const CHROME_DEB: &str = "google-chrome-stable_current_amd64.deb";

pub fn run(ctx: &Context) -> Result<()> {
    output::clear_screen();
    super::require_tools(ctx, &["git", "wget"])?;
    let mut labels = LabelQueue::new(LABELS)?;
    let apt_install = CommandTemplate::new("sudo apt -y install TARGET")?;

    // Step 1: placeholder for future capability.
    labels.advance()?;
    output::print_verdict(Verdict::Success);

    // Step 2: new directories.
    labels.advance()?;
    fsops::ensure_dirs(
        ctx,
        &[
            ctx.home.join(".vim/colors"),
            ctx.home.join("shares"),
            ctx.home.join("notebooks"),
            ctx.home.join(".notebooksrepo"),
        ],
    )?;
    output::print_verdict(Verdict::Success);

    // Step 3: dotfiles.
    labels.advance()?;
    fsops::copy_files(
        ctx,
        &[
            (ctx.shell.join("bashrc.txt"), ctx.home.join(".bashrc")),
            (ctx.shell.join("zshrc.txt"), ctx.home.join(".zshrc")),
            (ctx.shell.join("profile.txt"), ctx.home.join(".profile")),
            (ctx.shell.join("profile.txt"), ctx.home.join(".zprofile")),
            (ctx.shell.join("dircolors.txt"), ctx.home.join(".dircolors")),
            (ctx.vim.join("vimrc.txt"), ctx.home.join(".vimrc")),
            (ctx.vim.join("vimcolors/*"), ctx.home.join(".vim/colors")),
        ],
    )?;
    output::print_verdict(Verdict::Success);

    // Step 4: script permissions. Not strictly necessary, but cheap.
    labels.advance()?;
    let cmd = format!(
        "find {}/ -name *.sh -exec chmod 754 {{}} ;",
        ctx.scripts.display()
    );
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Step 5: terminal profile, loaded over stdin.
    labels.advance()?;
    let verdict = load_dconf_profile(ctx, "/org/gnome/terminal/", "terminalSettings.txt")?;
    output::print_verdict(verdict);

    output::operator_message(
        "Installing additional software. Please enter your password if prompted.",
    );
    // Dummy sudo command to force password entry before the first ppa
    // pull, so the prompt lands between labels.
    runner::run_one(ctx, "sudo ls", RunOptions::default())?;

    // Step 6: developer tools from the ppa.
    labels.advance()?;
    let verdict = runner::run_many(ctx, &apt_install, DEVELOPER_TOOLS)?;
    output::print_verdict(verdict);

    // Step 7: seahorse nautilus.
    labels.advance()?;
    let outcome = runner::run_one(
        ctx,
        "sudo apt -y install seahorse-nautilus",
        RunOptions::default(),
    )?;
    output::print_verdict(outcome.verdict);

    // Step 8: zsh, oh-my-zsh, and the custom theme.
    labels.advance()?;
    let mut verdict = runner::run_many(ctx, &apt_install, &["zsh", "powerline"])?;
    if verdict.is_success() {
        let cmd = format!(
            "git clone https://github.com/robbyrussell/oh-my-zsh.git {} --depth 1",
            ctx.ohmyzsh.display()
        );
        verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
    }
    if verdict.is_success() {
        fsops::copy_files(
            ctx,
            &[(
                ctx.shell.join("peter.zsh-theme"),
                ctx.ohmyzsh.join("custom/themes"),
            )],
        )?;
    }
    output::print_verdict(verdict);

    // Step 9: text editor profile, loaded over stdin.
    labels.advance()?;
    let verdict = load_dconf_profile(ctx, "/org/gnome/TextEditor/", "text_editor_settings.txt")?;
    output::print_verdict(verdict);

    // Steps 10-12: python packaging baseline and the default venv.
    for cmd in [
        "sudo apt install -y python3-pip",
        "sudo apt install -y python3-venv",
    ] {
        labels.advance()?;
        let outcome = runner::run_one(ctx, cmd, RunOptions::default())?;
        output::print_verdict(outcome.verdict);
    }
    labels.advance()?;
    let cmd = format!("python3 -m venv {}/.venv", ctx.home.display());
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Step 13: Google Chrome, downloaded then installed.
    labels.advance()?;
    let cmd = format!(
        "wget -O /tmp/{CHROME_DEB} https://dl.google.com/linux/direct/{CHROME_DEB}"
    );
    let mut verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
    if verdict.is_success() {
        let cmd = format!("sudo dpkg -i /tmp/{CHROME_DEB}");
        verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
    }
    output::print_verdict(verdict);

    // Step 14: jupyter notebooks, cloned then mirrored.
    labels.advance()?;
    let cmd = format!(
        "git clone https://github.com/geozeke/notebooks.git {}/.notebooksrepo \
         --single-branch --depth 1",
        ctx.home.display()
    );
    let mut verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
    if verdict.is_success() {
        verdict = super::sync_notebooks(ctx)?;
    }
    output::print_verdict(verdict);

    // Step 15: refresh snaps.
    labels.advance()?;
    let outcome = runner::run_one(ctx, "sudo snap refresh", RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Step 16: dock favorites. To regenerate the list, arrange favorites
    // by hand and run: gsettings get org.gnome.shell favorite-apps
    labels.advance()?;
    let list = format!("['{}']", FAVORITE_APPS.join("','"));
    let cmd = format!("gsettings set org.gnome.shell favorite-apps \"{list}\"");
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Steps 17-18: keep the session alive.
    for cmd in [
        "gsettings set org.gnome.desktop.screensaver lock-enabled false",
        "gsettings set org.gnome.desktop.session idle-delay 0",
    ] {
        labels.advance()?;
        let outcome = runner::run_one(ctx, cmd, RunOptions::default())?;
        output::print_verdict(outcome.verdict);
    }

    // Step 19: disable auto updates.
    labels.advance()?;
    let dest = "/etc/apt/apt.conf.d/20auto-upgrades";
    let patches = [
        r#"s+Update-Package-Lists\ \"1\"+Update-Package-Lists\ \"0\"+"#,
        r#"s+Unattended-Upgrade\ \"1\"+Unattended-Upgrade\ \"0\"+"#,
    ];
    let mut verdict = Verdict::Success;
    for patch in &patches {
        let cmd = format!("sudo sed -i {patch} {dest}");
        verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
        if !verdict.is_success() {
            break;
        }
    }
    output::print_verdict(verdict);

    // Step 20: un-comment user_allow_other so programs launch from inside
    // the share.
    labels.advance()?;
    let cmd = r"sudo sed -i s+\#user_allow_other+user_allow_other+ /etc/fuse.conf";
    let outcome = runner::run_one(ctx, cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Step 21: arrange icons.
    labels.advance()?;
    let gsettings = CommandTemplate::new("gsettings set TARGET")?;
    let verdict = runner::run_many(
        ctx,
        &gsettings,
        &[
            "org.gnome.shell.extensions.dash-to-dock show-trash false",
            "org.gnome.shell.extensions.dash-to-dock show-mounts false",
            "org.gnome.shell.extensions.ding start-corner bottom-left",
            "org.gnome.shell.extensions.ding show-trash true",
        ],
    )?;
    output::print_verdict(verdict);

    // Step 22: silently delete unused files, including Firefox.
    labels.advance()?;
    let cmd = format!("rm -f /tmp/{CHROME_DEB}");
    let mut verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
    if verdict.is_success() {
        verdict = runner::run_one(ctx, "sudo snap remove firefox", RunOptions::default())?.verdict;
    }
    output::print_verdict(verdict);

    output::operator_message(
        "Setup script is complete. If all steps above are marked with green \
         checkmarks, Ubuntu is ready to go. You must reboot your VM now for \
         the changes to take effect. If any steps above show a red \"X\", \
         there was an error during installation.",
    );
    Ok(())
}

/// Reset a dconf tree and reload it from a settings file over stdin. The
/// load only runs when the reset succeeded.
fn load_dconf_profile(ctx: &Context, tree: &str, settings: &str) -> Result<Verdict> {
    let cmd = format!("dconf reset -f {tree}");
    let verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
    if !verdict.is_success() {
        return Ok(verdict);
    }
    let path = ctx.system.join(settings);
    let cmd = format!("dconf load {tree}");
    let outcome = runner::run_one(
        ctx,
        &cmd,
        RunOptions {
            stdin: super::settings_stdin(ctx, &path)?,
            ..RunOptions::default()
        },
    )?;
    Ok(outcome.verdict)
}
