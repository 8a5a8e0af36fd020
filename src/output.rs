//! Operator-facing terminal presentation.
//!
//! The semantic verdict lives in `runner`; only its rendering lives here,
//! so engine behavior stays testable without comparing escape sequences.

use crate::runner::Verdict;
use owo_colors::OwoColorize;
use std::io::Write;

/// Column width for wrapped operator messages.
const MESSAGE_COLUMNS: usize = 70;

/// Render a verdict as its display glyph: green check or red X.
pub fn glyph(verdict: Verdict) -> String {
    match verdict {
        Verdict::Success => format!("{}", '\u{2714}'.green()),
        Verdict::Failure => format!("{}", '\u{2718}'.red()),
    }
}

/// Print the glyph that completes a step line started by `advance`.
pub fn print_verdict(verdict: Verdict) {
    println!("{}", glyph(verdict));
}

/// Reflow an indented multi-line message into one wrapped paragraph.
pub fn wrap_tight(msg: &str) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for word in msg.split_whitespace() {
        let width = word.chars().count();
        if line_len == 0 {
            out.push_str(word);
            line_len = width;
        } else if line_len + 1 + width > MESSAGE_COLUMNS {
            out.push('\n');
            out.push_str(word);
            line_len = width;
        } else {
            out.push(' ');
            out.push_str(word);
            line_len += 1 + width;
        }
    }
    out
}

/// Print a blank-line-framed, wrapped message to the operator.
pub fn operator_message(msg: &str) {
    println!("\n{}\n", wrap_tight(msg));
}

/// Clear the terminal before a pipeline starts printing labels.
pub fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_differ_per_verdict() {
        assert_ne!(glyph(Verdict::Success), glyph(Verdict::Failure));
        assert!(glyph(Verdict::Success).contains('\u{2714}'));
        assert!(glyph(Verdict::Failure).contains('\u{2718}'));
    }

    #[test]
    fn wrap_tight_collapses_whitespace_and_wraps() {
        let wrapped = wrap_tight("one\n    two\tthree");
        assert_eq!(wrapped, "one two three");

        let long = "word ".repeat(40);
        for line in wrap_tight(&long).lines() {
            assert!(line.chars().count() <= MESSAGE_COLUMNS);
        }
    }
}
