//! Error taxonomy for the step execution engine.
//!
//! A failing external command is deliberately absent here: a non-zero exit
//! status is an expected verdict, returned as data for the pipeline to
//! branch on. These types cover engine misuse and host problems only.

use thiserror::Error;

/// Errors raised by the step execution engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine misuse: empty label sets, unresolved paths, empty target
    /// lists. Always fatal and never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command string could not be split into an argument vector.
    #[error("malformed command string: {0}")]
    Parse(#[from] shell_words::ParseError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Errors from the label queue.
///
/// Both variants signal a defect in the calling pipeline (a mismatch
/// between declared labels and executed steps), not a runtime condition.
/// The decision to abort the process belongs to the top level, not the
/// queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// A label was requested after the queue emptied.
    #[error("cannot remove label, list of labels is empty")]
    Exhausted,

    /// An explicit index missed a non-empty queue.
    #[error("label index {index} out of range for queue of {len}")]
    OutOfRange { index: usize, len: usize },
}
