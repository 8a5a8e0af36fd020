//! Enterprise certificate patching for the mission network: refresh the
//! system CA store, or import the bundle into browser certificate
//! databases found in the user's home.

use crate::cli::CertpatchMode;
use crate::context::Context;
use crate::labels::LabelQueue;
use crate::output;
use crate::runner::{self, CommandTemplate, RunOptions, Verdict};
use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LABELS: &str = "
    Pulling updated enterprise certificates
    Patching openssl configuration
    Removing old certificates
    Creating fresh directories
    Copying new certificates
    Running update utilities
    Finding certificate databases in user's home
    Updating certificate databases
    Cleaning up";

const CERT_BUNDLE: &str = "apt.cs.usna.edu/ssl/system-certs-5.6-pa.tgz";
const SYSTEM_CERT_DIRS: &[&str] = &[
    "/usr/share/ca-certificates/dod",
    "/usr/local/share/ca-certificates/dod",
];

pub fn run(ctx: &Context, mode: CertpatchMode) -> Result<()> {
    output::clear_screen();
    super::require_tools(ctx, &["curl", "tar"])?;
    let mut labels = LabelQueue::new(LABELS)?;

    super::sudo_warmup(ctx)?;

    // Step 1: pull and unpack the updated bundle into scratch space.
    labels.advance()?;
    let scratch = tempfile::tempdir().context("create scratch directory")?;
    let bundle = scratch.path().join("certs.tgz");
    let chain = [
        format!("curl -o {} {CERT_BUNDLE}", bundle.display()),
        format!("tar -xpf {} -C {}", bundle.display(), scratch.path().display()),
    ];
    let mut verdict = Verdict::Success;
    for cmd in &chain {
        verdict = runner::run_one(ctx, cmd, RunOptions::default())?.verdict;
        if !verdict.is_success() {
            break;
        }
    }
    let certs = if verdict.is_success() {
        unpacked_certs(scratch.path())?
    } else {
        Vec::new()
    };
    output::print_verdict(verdict);

    match mode {
        CertpatchMode::System => patch_system_store(ctx, &mut labels, &certs)?,
        CertpatchMode::Browser => patch_browser_databases(ctx, &mut labels, &certs)?,
    }

    // Shared cleanup step.
    labels.advance()?;
    let cmd = format!("rm -rf {}", scratch.path().display());
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    output::operator_message(
        "Patch script is complete. If all steps above are marked with green \
         checkmarks, the certificate patching was successful. If any steps \
         above show a red \"X\", there was an error during certificate \
         modification.",
    );
    Ok(())
}

/// Certificates extracted from the bundle, ready for installation.
fn unpacked_certs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut certs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "crt") {
            certs.push(path);
        }
    }
    Ok(certs)
}

fn patch_system_store(
    ctx: &Context,
    labels: &mut LabelQueue,
    certs: &[PathBuf],
) -> Result<()> {
    // Patched openssl configuration.
    labels.advance()?;
    let cmd = format!(
        "sudo cp -f {}/openssl.cnf /usr/lib/ssl/openssl.cnf",
        ctx.system.display()
    );
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Clear out old certificate directories.
    labels.advance()?;
    let template = CommandTemplate::new("sudo rm -rf TARGET")?;
    let verdict = runner::run_many(ctx, &template, SYSTEM_CERT_DIRS)?;
    output::print_verdict(verdict);

    labels.advance()?;
    let cmd = format!("sudo mkdir -p {}", SYSTEM_CERT_DIRS[1]);
    let outcome = runner::run_one(ctx, &cmd, RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // Copy every certificate; stop at the first failure.
    labels.advance()?;
    let mut verdict = Verdict::Success;
    for cert in certs {
        let cmd = format!("sudo cp {} {}", cert.display(), SYSTEM_CERT_DIRS[1]);
        verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
        if !verdict.is_success() {
            break;
        }
    }
    output::print_verdict(verdict);

    labels.advance()?;
    let outcome = runner::run_one(ctx, "sudo update-ca-certificates -f", RunOptions::default())?;
    output::print_verdict(outcome.verdict);

    // The browser-only steps will not run.
    labels.discard(2);
    Ok(())
}

fn patch_browser_databases(
    ctx: &Context,
    labels: &mut LabelQueue,
    certs: &[PathBuf],
) -> Result<()> {
    // The system-only steps will not run.
    labels.discard(5);

    labels.advance()?;
    let databases = find_cert_databases(&ctx.home);
    output::print_verdict(Verdict::Success);

    // Import every certificate into every database found, stopping at the
    // first failure.
    labels.advance()?;
    let mut verdict = Verdict::Success;
    'databases: for db in &databases {
        let Some(parent) = db.parent() else { continue };
        for cert in certs {
            let stem = cert
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let cmd = format!(
                "certutil -d sql:{} -A -t \"TC\" -n {stem} -i {}",
                parent.display(),
                cert.display()
            );
            verdict = runner::run_one(ctx, &cmd, RunOptions::default())?.verdict;
            if !verdict.is_success() {
                break 'databases;
            }
        }
    }
    output::print_verdict(verdict);
    Ok(())
}

/// Certificate databases (`cert*.db`) inside any hidden directory under
/// the user's home.
fn find_cert_databases(home: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(home) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if !hidden || !path.is_dir() {
            continue;
        }
        for file in WalkDir::new(&path).into_iter().flatten() {
            if !file.file_type().is_file() {
                continue;
            }
            let name = file.file_name().to_string_lossy();
            if name.starts_with("cert") && name.ends_with(".db") {
                found.push(file.into_path());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cert_databases_found_only_in_hidden_dirs() {
        let scratch = tempfile::tempdir().expect("temp dir");
        let hidden = scratch.path().join(".mozilla/firefox/profile");
        let visible = scratch.path().join("documents");
        fs::create_dir_all(&hidden).unwrap();
        fs::create_dir_all(&visible).unwrap();
        fs::write(hidden.join("cert9.db"), "").unwrap();
        fs::write(hidden.join("key4.db"), "").unwrap();
        fs::write(visible.join("cert9.db"), "").unwrap();

        let found = find_cert_databases(scratch.path());
        assert_eq!(found, vec![hidden.join("cert9.db")]);
    }

    #[test]
    fn unpacked_certs_picks_crt_files_only() {
        let scratch = tempfile::tempdir().expect("temp dir");
        fs::write(scratch.path().join("root.crt"), "").unwrap();
        fs::write(scratch.path().join("bundle.tgz"), "").unwrap();

        let certs = unpacked_certs(scratch.path()).expect("scan");
        assert_eq!(certs, vec![scratch.path().join("root.crt")]);
    }
}
