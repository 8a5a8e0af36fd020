//! Step label queue.
//!
//! Keeps the printed step description in lock-step with the step about to
//! execute. Labels are consumed strictly front-to-back; the pad width is
//! computed once from the initial label set and never recomputed, so a
//! partially drained queue still lines up with steps printed earlier.

use crate::error::{EngineError, LabelError};
use std::collections::VecDeque;
use std::io::Write;

/// Fixed margin added to the longest label when computing the pad width.
const PAD_MARGIN: usize = 3;

/// Ordered queue of human-readable step labels with a shared pad width.
#[derive(Debug)]
pub struct LabelQueue {
    labels: VecDeque<String>,
    pad: usize,
}

impl LabelQueue {
    /// Build a queue from a block of newline-separated text. Lines are
    /// trimmed and blank lines dropped; an empty result leaves the pad
    /// width undefined and is rejected.
    pub fn new(text: &str) -> Result<Self, EngineError> {
        let labels: VecDeque<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let longest = labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .ok_or_else(|| EngineError::config("label text contains no labels"))?;
        Ok(Self {
            pad: longest + PAD_MARGIN,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pad width shared by every label in this queue.
    pub fn pad(&self) -> usize {
        self.pad
    }

    /// Pop the front label and print it dot-padded with no trailing
    /// newline. The caller prints the verdict glyph once its command
    /// completes.
    pub fn advance(&mut self) -> Result<(), LabelError> {
        let label = self.labels.pop_front().ok_or(LabelError::Exhausted)?;
        print!("{label:.<pad$}", pad = self.pad);
        let _ = std::io::stdout().flush();
        Ok(())
    }

    /// Pop and return the front label without printing.
    pub fn take_first(&mut self) -> Result<String, LabelError> {
        self.labels.pop_front().ok_or(LabelError::Exhausted)
    }

    /// Pop and return the back label without printing.
    pub fn take_last(&mut self) -> Result<String, LabelError> {
        self.labels.pop_back().ok_or(LabelError::Exhausted)
    }

    /// Pop and return the label at `index`. An out-of-range index on a
    /// non-empty queue is a pipeline defect; whether to abort the process
    /// is the caller's call, not the queue's.
    pub fn take_at(&mut self, index: usize) -> Result<String, LabelError> {
        if self.labels.is_empty() {
            return Err(LabelError::Exhausted);
        }
        let len = self.labels.len();
        self.labels
            .remove(index)
            .ok_or(LabelError::OutOfRange { index, len })
    }

    /// Silently drop the first `n` labels, used when a conditional branch
    /// skips steps. Refuses (no-op) when `n` is zero or exceeds the queue
    /// length rather than partially discarding.
    pub fn discard(&mut self, n: usize) {
        if n == 0 || n > self.labels.len() {
            return;
        }
        self.labels.drain(..n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(text: &str) -> LabelQueue {
        LabelQueue::new(text).expect("non-empty label text")
    }

    #[test]
    fn trims_lines_and_drops_blanks() {
        let labels = queue("  Step One \n\nStep Two\n  ");
        assert_eq!(labels.len(), 2);
        // "Step One" is the longest at 8 chars.
        assert_eq!(labels.pad(), 11);
    }

    #[test]
    fn empty_text_is_a_configuration_error() {
        assert!(LabelQueue::new("  \n \n").is_err());
        assert!(LabelQueue::new("").is_err());
    }

    #[test]
    fn advance_drains_in_order_then_exhausts() {
        let mut labels = queue("one\ntwo\nthree");
        for _ in 0..3 {
            labels.advance().expect("queue not yet empty");
        }
        assert!(labels.is_empty());
        assert_eq!(labels.advance(), Err(LabelError::Exhausted));
    }

    #[test]
    fn take_first_and_last_observe_fifo_ends() {
        let mut labels = queue("one\ntwo\nthree");
        assert_eq!(labels.take_first().unwrap(), "one");
        assert_eq!(labels.take_last().unwrap(), "three");
        assert_eq!(labels.take_first().unwrap(), "two");
        assert_eq!(labels.take_last(), Err(LabelError::Exhausted));
    }

    #[test]
    fn take_at_distinguishes_empty_from_out_of_range() {
        let mut labels = queue("one\ntwo");
        assert_eq!(
            labels.take_at(5),
            Err(LabelError::OutOfRange { index: 5, len: 2 })
        );
        assert_eq!(labels.take_at(1).unwrap(), "two");
        assert_eq!(labels.take_at(0).unwrap(), "one");
        assert_eq!(labels.take_at(0), Err(LabelError::Exhausted));
    }

    #[test]
    fn discard_removes_from_the_front() {
        let mut labels = queue("one\ntwo\nthree\nfour");
        labels.discard(2);
        assert_eq!(labels.take_first().unwrap(), "three");
        assert_eq!(labels.take_first().unwrap(), "four");
    }

    #[test]
    fn discard_refuses_zero_and_oversized_counts() {
        let mut labels = queue("one\ntwo");
        labels.discard(0);
        assert_eq!(labels.len(), 2);
        labels.discard(3);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn pad_is_not_recomputed_as_labels_drain() {
        let mut labels = queue("a much longer label\nshort");
        let pad = labels.pad();
        labels.take_first().unwrap();
        assert_eq!(labels.pad(), pad);
    }
}
