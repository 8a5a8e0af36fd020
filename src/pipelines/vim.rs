//! Vim configuration: settings file and color schemes only. Redundant
//! after a full `setup` run, kept for machines that only want vim fixed.

use crate::context::Context;
use crate::fsops;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::Verdict;
use anyhow::Result;

const LABELS: &str = "
    System initialization
    Creating new directories
    Copying files";

pub fn run(ctx: &Context) -> Result<()> {
    output::clear_screen();
    let mut labels = LabelQueue::new(LABELS)?;

    // Placeholder for future capability.
    labels.advance()?;
    output::print_verdict(Verdict::Success);

    labels.advance()?;
    fsops::ensure_dirs(ctx, &[ctx.home.join(".vim/colors")])?;
    output::print_verdict(Verdict::Success);

    labels.advance()?;
    fsops::copy_files(
        ctx,
        &[
            (ctx.vim.join("vimrc.txt"), ctx.home.join(".vimrc")),
            (ctx.vim.join("vimcolors/*"), ctx.home.join(".vim/colors")),
        ],
    )?;
    output::print_verdict(Verdict::Success);

    output::operator_message(
        "vim setup complete. You are now ready to use vi or vim and enjoy a \
         pleasing visual experience.",
    );
    Ok(())
}
