//! System update pass: apt and snap refreshes run verbosely, plus an
//! optional second phase covering pip tools and the notebooks mirror.

use crate::context::Context;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, OutputMode, RunOptions};
use anyhow::Result;

const LABELS: &str = "
    Pulling updates to git repo
    Scanning for updates to pip
    Scanning for updates to jupyter
    Scanning for updates to jupyter lab
    Scanning for updates to pytest
    Synchronizing jupyter notebooks";

/// pip itself first, so later upgrades run through a current installer.
const PIP_TOOLS: &[&str] = &["pip", "jupyter", "jupyterlab", "pytest"];

pub fn run(ctx: &Context, all: bool) -> Result<()> {
    let mut labels = LabelQueue::new(LABELS)?;

    // The system updates run verbosely so the operator sees apt's own
    // progress; no labels or glyphs for these.
    let updates = [
        "sudo apt update",
        "sudo apt upgrade -y",
        "sudo apt autoclean -y",
        "sudo apt autoremove -y",
        "sudo snap refresh",
    ];
    for cmd in &updates {
        runner::run_one(
            ctx,
            cmd,
            RunOptions {
                output: OutputMode::Inherit,
                ..RunOptions::default()
            },
        )?;
    }

    if all {
        println!("\nPerforming additional updates\n");

        // Pull the provisioning repo itself so custom patches can land
        // later.
        labels.advance()?;
        let cmd = format!("git -C {} pull", ctx.root.display());
        let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
        output::print_verdict(outcome.verdict);

        for tool in PIP_TOOLS {
            let probe = format!("pip3 show {tool}");
            let installed = runner::run_one(ctx, &probe, RunOptions::default())?
                .verdict
                .is_success();
            if installed {
                labels.advance()?;
                let cmd = format!("pip3 install --upgrade {tool}");
                let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
                output::print_verdict(outcome.verdict);
            } else {
                // Not installed: drop the label without printing it.
                labels.take_first()?;
            }
        }

        labels.advance()?;
        let cmd = format!("git -C {}/.notebooksrepo pull", ctx.home.display());
        let mut verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
        if verdict.is_success() {
            verdict = super::sync_notebooks(ctx)?;
        }
        output::print_verdict(verdict);
    }

    output::operator_message(
        "All updates and upgrades are complete. A reboot is recommended to \
         ensure that the changes take effect.",
    );
    Ok(())
}
