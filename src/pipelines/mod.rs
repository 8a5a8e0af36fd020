//! Provisioning pipelines: fixed, hand-authored step sequences built on
//! the label queue and command runner.
//!
//! Every pipeline follows the same shape: build its label queue, advance
//! one label per step, run the step's commands, print the verdict glyph,
//! and chain dependent steps on the previous verdict. A failed step never
//! stops the pipeline on its own; only the explicit verdict checks below
//! suppress dependent work.

pub mod cacheburn;
pub mod certpatch;
pub mod docker;
pub mod pyenv;
pub mod pytools;
pub mod setup;
pub mod tuneup;
pub mod vim;

use crate::context::Context;
use crate::output;
use crate::runner::{self, RunOptions, Verdict};
use anyhow::{Context as _, Result};
use std::fs::File;
use std::path::Path;

/// Warm the sudo credential cache so the password prompt lands before the
/// first label instead of in the middle of one.
pub(crate) fn sudo_warmup(ctx: &Context) -> Result<()> {
    output::operator_message("Please enter your password if prompted.");
    runner::run_one(ctx, "sudo ls", RunOptions::default())?;
    Ok(())
}

/// Verify required external tools exist before any label prints. Skipped
/// in dry-run mode, which spawns nothing.
pub(crate) fn require_tools(ctx: &Context, tools: &[&str]) -> Result<()> {
    if ctx.dry_run {
        return Ok(());
    }
    for tool in tools {
        which::which(tool).with_context(|| format!("required tool `{tool}` not found in PATH"))?;
    }
    Ok(())
}

/// Open a settings file for stdin redirection. In dry-run mode the file is
/// never read, so no handle is opened.
pub(crate) fn settings_stdin(ctx: &Context, path: &Path) -> Result<Option<File>> {
    if ctx.dry_run {
        tracing::debug!(path = %path.display(), "dry-run: skipping stdin redirect");
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    Ok(Some(file))
}

/// Mirror the hidden notebooks repo into `~/notebooks` with rsync. The
/// trailing slash on the source syncs its contents rather than the
/// directory itself; `--delete-excluded` keeps strays out of the mirror.
pub(crate) fn sync_notebooks(ctx: &Context) -> Result<Verdict> {
    let src = format!("{}/.notebooksrepo/", ctx.home.display());
    let dest = ctx.home.join("notebooks");
    let exclude = ctx.system.join("rsync_exclude.txt");
    let cmd = format!(
        "rsync {src} {} -rc --exclude-from={} --delete --delete-excluded",
        dest.display(),
        exclude.display()
    );
    Ok(runner::run_one(ctx, &cmd, RunOptions::default())?.verdict)
}
