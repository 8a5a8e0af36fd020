//! Cache cleanup under `~/shares`: tool cache directories and the junk
//! files that network shares accumulate.

use crate::context::Context;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, RunOptions};
use anyhow::Result;

const LABELS: &str = "
    Deleting __pycache__ directories
    Deleting .pytest_cache directories
    Deleting .ipynb_checkpoints directories
    Zapping pesky Icon files
    Crunching annoying desktop.ini files";

pub fn run(ctx: &Context) -> Result<()> {
    println!();
    let mut labels = LabelQueue::new(LABELS)?;
    let shares = ctx.home.join("shares");
    let shares = shares.display();

    // Cache directories first. The trailing `-prune` stops find from
    // descending into a directory it just removed.
    for dir in ["__pycache__", ".pytest_cache", ".ipynb_checkpoints"] {
        labels.advance()?;
        let cmd = format!("find {shares} -name {dir} -type d -exec rm -rvf {{}} ; -prune");
        let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
        output::print_verdict(outcome.verdict);
    }

    // Then the stray files. Icon files only count when empty.
    let file_cmds = [
        format!("find {shares} -name Icon? -size 0 -type f -delete"),
        format!("find {shares} -name desktop.ini -type f -delete"),
    ];
    for cmd in &file_cmds {
        labels.advance()?;
        let outcome = runner::run_one(ctx, cmd, RunOptions::default())?;
        output::print_verdict(outcome.verdict);
    }

    println!();
    Ok(())
}
