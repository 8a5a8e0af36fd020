//! Uniform external command execution.
//!
//! Every pipeline step goes through here: a command string (or a template
//! applied across many values) is shell-word-split, spawned as a child
//! process, and reduced to a binary verdict. A non-zero exit status is
//! never an error; it is the dominant expected outcome and the pipeline
//! branches on it. Execution is blocking and synchronous, with no timeout.

use crate::context::Context;
use crate::error::EngineError;
use std::fs::File;
use std::process::{Command, Stdio};

/// Marker token replaced per-invocation in a templated command.
pub const DEFAULT_MARKER: &str = "TARGET";

/// Binary outcome of one step, derived solely from the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::Success)
    }
}

/// Raw result of one invocation, returned explicitly to the caller.
/// `stdout`/`stderr` are empty unless the run captured output.
#[derive(Debug)]
pub struct RunOutcome {
    pub verdict: Verdict,
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutcome {
    fn assumed_success() -> Self {
        Self {
            verdict: Verdict::Success,
            exit_code: Some(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    fn from_status(status: std::process::ExitStatus) -> Self {
        Self {
            verdict: if status.success() {
                Verdict::Success
            } else {
                Verdict::Failure
            },
            exit_code: status.code(),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    /// Captured stdout as trimmed UTF-8, for commands whose output feeds a
    /// later step (e.g. `dpkg --print-architecture`).
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim_end().to_string()
    }
}

/// Where a live command's standard streams go.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Capture stdout and stderr into the outcome.
    #[default]
    Capture,
    /// Let the command write through to the operator's terminal.
    Inherit,
    /// Discard output entirely.
    Quiet,
}

/// Per-invocation options: output routing plus optional stdin redirection
/// from an open file (used for commands that load settings via stdin).
#[derive(Debug, Default)]
pub struct RunOptions {
    pub output: OutputMode,
    pub stdin: Option<File>,
}

/// Run a single command and reduce it to a verdict.
///
/// In dry-run mode the split argv is traced and an assumed-success outcome
/// returned without spawning anything. Malformed quoting in the command
/// string is an error in both modes; a failing child process never is.
pub fn run_one(ctx: &Context, cmd: &str, options: RunOptions) -> Result<RunOutcome, EngineError> {
    let argv = shell_words::split(cmd)?;
    run_argv(ctx, argv, options)
}

fn run_argv(
    ctx: &Context,
    argv: Vec<String>,
    options: RunOptions,
) -> Result<RunOutcome, EngineError> {
    if argv.is_empty() {
        return Err(EngineError::config("empty command string"));
    }
    if ctx.dry_run {
        println!("\nwould run: {}", shell_words::join(&argv));
        return Ok(RunOutcome::assumed_success());
    }

    tracing::debug!(command = %shell_words::join(&argv), "spawning");
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    if let Some(stdin) = options.stdin {
        command.stdin(Stdio::from(stdin));
    }

    let outcome = match options.output {
        OutputMode::Capture => {
            let output = command.output()?;
            RunOutcome {
                verdict: if output.status.success() {
                    Verdict::Success
                } else {
                    Verdict::Failure
                },
                exit_code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            }
        }
        OutputMode::Inherit => RunOutcome::from_status(command.status()?),
        OutputMode::Quiet => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
            RunOutcome::from_status(command.status()?)
        }
    };
    Ok(outcome)
}

/// A shell-word-split command with marker tokens substituted per value.
///
/// The marker must match a whole token, so a value containing the marker
/// text cannot corrupt later substitutions the way a substring replace
/// would.
#[derive(Debug)]
pub struct CommandTemplate {
    argv: Vec<String>,
    slots: Vec<usize>,
}

impl CommandTemplate {
    /// Parse a template using the default `TARGET` marker.
    pub fn new(cmd: &str) -> Result<Self, EngineError> {
        Self::with_marker(cmd, DEFAULT_MARKER)
    }

    /// Parse a template, recording every position where `marker` appears
    /// as a whole token. A template without a marker token can never
    /// consume a value and is rejected.
    pub fn with_marker(cmd: &str, marker: &str) -> Result<Self, EngineError> {
        let argv = shell_words::split(cmd)?;
        if argv.is_empty() {
            return Err(EngineError::config("empty command template"));
        }
        let slots: Vec<usize> = argv
            .iter()
            .enumerate()
            .filter(|(_, token)| token.as_str() == marker)
            .map(|(position, _)| position)
            .collect();
        if slots.is_empty() {
            return Err(EngineError::config(format!(
                "template has no {marker} token: {cmd}"
            )));
        }
        Ok(Self { argv, slots })
    }

    fn render(&self, value: &str) -> Vec<String> {
        let mut argv = self.argv.clone();
        for &slot in &self.slots {
            argv[slot] = value.to_string();
        }
        argv
    }
}

/// Run a templated command once per value, in list order, capturing output.
///
/// Stops at the first failure without attempting the remaining values and
/// returns `Failure`; returns `Success` only when every value succeeded.
/// An empty value list produces no verdict and is rejected as engine
/// misuse.
pub fn run_many<S: AsRef<str>>(
    ctx: &Context,
    template: &CommandTemplate,
    values: &[S],
) -> Result<Verdict, EngineError> {
    if values.is_empty() {
        return Err(EngineError::config("run_many called with no values"));
    }
    for value in values {
        let outcome = run_argv(ctx, template.render(value.as_ref()), RunOptions::default())?;
        if !outcome.verdict.is_success() {
            return Ok(Verdict::Failure);
        }
    }
    Ok(Verdict::Success)
}
