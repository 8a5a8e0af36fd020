//! CLI argument parsing for the provisioning pipelines.
//!
//! The CLI is intentionally thin: each subcommand maps straight onto one
//! pipeline, with the shared flags (dry-run, asset root, verbosity) held
//! once at the root instead of repeated per command.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Root CLI entrypoint for the provisioning pipelines.
#[derive(Parser, Debug)]
#[command(
    name = "uprov",
    version,
    about = "Step-driven provisioning for Ubuntu workstations",
    after_help = "Examples:\n  uprov setup\n  uprov docker --dry-run\n  uprov tuneup --all\n  uprov certpatch system",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Trace every command without touching the host
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Asset tree root (defaults to ~/ubuntu)
    #[arg(long, value_name = "DIR", env = "UPROV_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Raise log verbosity (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per provisioning pipeline.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install workstation tools, programs, and settings
    Setup,
    /// Install Docker Engine and Docker Compose
    Docker,
    /// Install pyenv and its build dependencies
    Pyenv,
    /// Install vim settings and color schemes
    Vim,
    /// Install Python development tools (jupyter, jupyterlab, pytest)
    Pytools,
    /// Update system packages, optionally Python tools and notebooks
    Tuneup(TuneupArgs),
    /// Delete cache directories and junk files under ~/shares
    Cacheburn,
    /// Patch enterprise certificates for the mission network
    Certpatch(CertpatchArgs),
}

/// Tuneup command inputs.
#[derive(Parser, Debug)]
pub struct TuneupArgs {
    /// Also upgrade preinstalled pip packages and synchronize notebooks
    #[arg(short, long)]
    pub all: bool,
}

/// Certpatch command inputs.
#[derive(Parser, Debug)]
pub struct CertpatchArgs {
    /// Where to apply certificate patches
    #[arg(value_enum)]
    pub mode: CertpatchMode,
}

/// Target store for certificate patching.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertpatchMode {
    /// Patch the openssl configuration and system CA store
    System,
    /// Update browser certificate databases in the user's home
    Browser,
}
