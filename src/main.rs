use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod context;
mod error;
mod fsops;
mod labels;
mod output;
mod pipelines;
mod runner;

use cli::{Command, RootArgs};
use context::Context;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let ctx = Context::new(args.root.clone(), args.dry_run)?;

    // The release gate protects the host from pipelines written against a
    // newer distribution; a dry run touches nothing and skips it.
    if !ctx.dry_run {
        if let Some(message) = ctx.check_host_release()? {
            anyhow::bail!(message);
        }
    }

    match args.command {
        Command::Setup => pipelines::setup::run(&ctx),
        Command::Docker => pipelines::docker::run(&ctx),
        Command::Pyenv => pipelines::pyenv::run(&ctx),
        Command::Vim => pipelines::vim::run(&ctx),
        Command::Pytools => pipelines::pytools::run(&ctx),
        Command::Tuneup(tuneup) => pipelines::tuneup::run(&ctx, tuneup.all),
        Command::Cacheburn => pipelines::cacheburn::run(&ctx),
        Command::Certpatch(certpatch) => pipelines::certpatch::run(&ctx, certpatch.mode),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
