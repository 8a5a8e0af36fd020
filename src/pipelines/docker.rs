//! Docker Engine and Docker Compose installation, including the apt
//! keyring and repository mapping steps.

use crate::context::Context;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, CommandTemplate, RunOptions, Verdict};
use anyhow::{Context as _, Result};
use std::env;
use std::fs;

const LABELS: &str = "
    System initialization
    Updating package index
    Installing dependencies
    Installing Docker public key
    Mapping the Docker repository
    Installing Docker Engine
    Installing Docker Compose
    Adding user to Docker group";

const KEY_URL: &str = "https://download.docker.com/linux/ubuntu/gpg";
const KEYRING: &str = "/usr/share/keyrings/docker-archive-keyring.gpg";
const APT_LIST: &str = "/etc/apt/sources.list.d/docker.list";

const DEPENDENCIES: &[&str] = &[
    "apt-transport-https",
    "ca-certificates",
    "curl",
    "gnupg-agent",
    "make",
    "software-properties-common",
];

pub fn run(ctx: &Context) -> Result<()> {
    output::clear_screen();
    super::require_tools(ctx, &["curl", "gpg"])?;
    let mut labels = LabelQueue::new(LABELS)?;

    super::sudo_warmup(ctx)?;

    // Scratch space for the keyring and repo list before sudo moves them
    // into place.
    let scratch = tempfile::tempdir().context("create scratch directory")?;

    // Placeholder for future capability.
    labels.advance()?;
    output::print_verdict(Verdict::Success);

    labels.advance()?;
    for cmd in ["sudo apt update", "sudo apt upgrade -y"] {
        runner::run_one(ctx, cmd, RunOptions::default())?;
    }
    output::print_verdict(Verdict::Success);

    labels.advance()?;
    let template = CommandTemplate::new("sudo apt install TARGET -y")?;
    let verdict = runner::run_many(ctx, &template, DEPENDENCIES)?;
    output::print_verdict(verdict);

    // Fetch the signing key, dearmor it, and move it into the keyring
    // directory. Each step depends on the previous one.
    labels.advance()?;
    let asc = scratch.path().join("docker.asc");
    let dearmored = scratch.path().join("docker.gpg");
    let chain = [
        format!("curl -o {} -fsSL {KEY_URL}", asc.display()),
        format!("gpg -o {} --dearmor {}", dearmored.display(), asc.display()),
        format!("sudo mv {} {KEYRING} -f", dearmored.display()),
    ];
    let mut verdict = Verdict::Success;
    for cmd in &chain {
        verdict = runner::run_one(ctx, cmd, RunOptions::default())?.verdict;
        if !verdict.is_success() {
            break;
        }
    }
    output::print_verdict(verdict);

    // The deb line needs the host architecture and release codename, read
    // from the captured stdout of the two probe commands.
    labels.advance()?;
    let arch = runner::run_one(ctx, "dpkg --print-architecture", RunOptions::default())?
        .stdout_text();
    let codename = runner::run_one(ctx, "lsb_release -cs", RunOptions::default())?.stdout_text();
    let deb = format!(
        "deb [arch={arch} signed-by={KEYRING}] https://download.docker.com/linux/ubuntu \
         {codename} stable"
    );
    let list = scratch.path().join("docker.list");
    if ctx.dry_run {
        println!("\nwould write: {} -> {}", deb, list.display());
    } else {
        fs::write(&list, format!("{deb}\n"))
            .with_context(|| format!("write {}", list.display()))?;
    }
    let cmd = format!("sudo mv {} {APT_LIST} -f", list.display());
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    labels.advance()?;
    let mut verdict = runner::run_one(ctx, "sudo apt update", RunOptions::default())?.verdict;
    if verdict.is_success() {
        verdict = runner::run_many(
            ctx,
            &template,
            &["docker-ce", "docker-ce-cli", "containerd.io"],
        )?;
    }
    output::print_verdict(verdict);

    labels.advance()?;
    let outcome = runner::run_one(
        ctx,
        "sudo apt install docker-compose-plugin -y",
        RunOptions::default(),
    )?;
    output::print_verdict(outcome.verdict);

    labels.advance()?;
    let user = current_user()?;
    let cmd = format!("sudo usermod -aG docker {user}");
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    output::operator_message(
        "Setup script is complete. If all steps above are marked with green \
         checkmarks, Docker Engine is ready to go. You must reboot your VM \
         now for the changes to take effect. If any steps above show a red \
         \"X\", there was an error during installation.",
    );
    Ok(())
}

fn current_user() -> Result<String> {
    env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .context("neither USER nor LOGNAME is set")
}
