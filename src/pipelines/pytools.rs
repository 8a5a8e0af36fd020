//! Python development tools: jupyter, jupyterlab, and pytest via pip.

use crate::context::Context;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, RunOptions, Verdict};
use anyhow::Result;

const LABELS: &str = "
    System initialization
    Installing jupyter
    Installing jupyter lab
    Installing pytest";

pub fn run(ctx: &Context) -> Result<()> {
    output::clear_screen();
    let mut labels = LabelQueue::new(LABELS)?;

    // Placeholder for future capability.
    labels.advance()?;
    output::print_verdict(Verdict::Success);

    for tool in ["jupyter", "jupyterlab", "pytest"] {
        labels.advance()?;
        let cmd = format!("pip3 install --upgrade {tool}");
        let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
        output::print_verdict(outcome.verdict);
    }

    output::operator_message(
        "Python tools installation complete. Install additional tools if \
         desired. No reboot is necessary.",
    );
    Ok(())
}
