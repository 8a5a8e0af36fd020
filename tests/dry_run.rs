//! Dry-run integration: every pipeline must complete, print its labels,
//! and trace its commands without touching the host when --dry-run is set.

use std::process::{Command, Output};

fn run_dry(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_uprov"))
        .args(args)
        .arg("--dry-run")
        .env("UPROV_ROOT", "/nonexistent/assets")
        .env("USER", "tester")
        .output()
        .expect("spawn uprov")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "uprov failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn vim_pipeline_prints_every_label() {
    let output = run_dry(&["vim"]);
    let stdout = stdout_of(&output);
    for label in [
        "System initialization",
        "Creating new directories",
        "Copying files",
    ] {
        assert!(stdout.contains(label), "missing label {label:?}");
    }
    assert!(stdout.contains('\u{2714}'));
}

#[test]
fn docker_pipeline_traces_commands_without_running_them() {
    let output = run_dry(&["docker"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("would run:"));
    assert!(stdout.contains("Adding user to Docker group"));
    // The verbose failure glyph never appears in a dry run.
    assert!(!stdout.contains('\u{2718}'));
}

#[test]
fn setup_pipeline_runs_all_steps_dry() {
    let output = run_dry(&["setup"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Installing developer tools"));
    assert!(stdout.contains("Cleaning up"));
    assert!(stdout.contains("would copy:"));
    assert!(stdout.contains("Setup script is complete"));
}

#[test]
fn certpatch_system_skips_browser_labels() {
    let output = run_dry(&["certpatch", "system"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Running update utilities"));
    assert!(stdout.contains("Cleaning up"));
    // Browser-mode steps are discarded, not printed.
    assert!(!stdout.contains("Updating certificate databases"));
}

#[test]
fn tuneup_all_includes_the_extra_phase() {
    let output = run_dry(&["tuneup", "--all"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Performing additional updates"));
    assert!(stdout.contains("Pulling updates to git repo"));
}

#[test]
fn tuneup_without_all_skips_labels_entirely() {
    let output = run_dry(&["tuneup"]);
    let stdout = stdout_of(&output);
    assert!(!stdout.contains("Pulling updates to git repo"));
    assert!(stdout.contains("All updates and upgrades are complete"));
}

#[test]
fn cacheburn_prints_one_glyph_per_label() {
    let output = run_dry(&["cacheburn"]);
    let stdout = stdout_of(&output);
    assert_eq!(stdout.matches('\u{2714}').count(), 5);
}
