//! pyenv installation: build dependencies, a shallow clone, and shell rc
//! wiring so new shells pick the tool up.

use crate::context::Context;
use crate::fsops;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, CommandTemplate, RunOptions, Verdict};
use anyhow::Result;

const LABELS: &str = "
    System initialization
    Updating package index
    Checking dependencies
    Cloning git repository
    Adjusting shell environments";

/// Packages pyenv needs to build Python releases from source.
const DEPENDENCIES: &[&str] = &[
    "make",
    "build-essential",
    "libssl-dev",
    "zlib1g-dev",
    "libbz2-dev",
    "libreadline-dev",
    "libsqlite3-dev",
    "wget",
    "curl",
    "llvm",
    "libncursesw5-dev",
    "xz-utils",
    "tk-dev",
    "libxml2-dev",
    "libxmlsec1-dev",
    "libffi-dev",
    "liblzma-dev",
    "git",
];

pub fn run(ctx: &Context) -> Result<()> {
    output::clear_screen();
    super::require_tools(ctx, &["git"])?;
    let mut labels = LabelQueue::new(LABELS)?;

    super::sudo_warmup(ctx)?;

    // Placeholder for future capability.
    labels.advance()?;
    output::print_verdict(Verdict::Success);

    labels.advance()?;
    let outcome = runner::run_one(ctx, "sudo apt update", RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    labels.advance()?;
    let template = CommandTemplate::new("sudo apt install TARGET -y")?;
    let verdict = runner::run_many(ctx, &template, DEPENDENCIES)?;
    output::print_verdict(verdict);

    labels.advance()?;
    let cmd = format!(
        "git clone https://github.com/pyenv/pyenv.git {}/.pyenv --depth 1",
        ctx.home.display()
    );
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    labels.advance()?;
    let src = ctx.shell.join("pyenvsupport.txt");
    let dests = [ctx.home.join(".bashrc"), ctx.home.join(".zshrc")];
    let verdict = match fsops::append_file(ctx, &src, &dests) {
        Ok(()) => Verdict::Success,
        Err(err) => {
            tracing::debug!(error = %err, "shell environment adjustment failed");
            Verdict::Failure
        }
    };
    output::print_verdict(verdict);

    output::operator_message(
        "Setup script is complete. If all steps above are marked with green \
         checkmarks, pyenv is ready to go. You must reboot your VM now for \
         the changes to take effect. If any steps above show a red \"X\", \
         there was an error during installation.",
    );
    Ok(())
}
