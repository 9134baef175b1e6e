//! Shared test utilities for the tspl-labels test suite.
//!
//! Provides record fixtures and extractors that slice a generated program
//! into its blocks and command lines.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let program = generate_small(&records(5), &LabelOptions::default()).unwrap();
//! let pages = content_blocks(&program);
//! assert_eq!(count_commands(pages[0], "QRCODE "), 4);
//! ```

use crate::types::LabelRecord;

// =========================================================================
// Fixtures
// =========================================================================

/// `n` distinct records: `QR-1`/`Item 1`/`ID-1`, `QR-2`/`Item 2`/`ID-2`, ...
pub fn records(n: usize) -> Vec<LabelRecord> {
    (1..=n)
        .map(|i| LabelRecord::new(format!("QR-{i}"), format!("Item {i}"), format!("ID-{i}")))
        .collect()
}

// =========================================================================
// Program slicing
// =========================================================================

/// Opening markup shared by every content page (the header uses quantity 0).
const CONTENT_OPEN: &str = "<xpml><page quantity='1'";

/// Every content-page block in a program, in order, without the header or
/// the end-of-document markup.
pub fn content_blocks(program: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = program.match_indices(CONTENT_OPEN).map(|(i, _)| i).collect();
    let end = program.rfind("<xpml><end/></xpml>").unwrap_or(program.len());
    starts.push(end);
    starts.windows(2).map(|w| &program[w[0]..w[1]]).collect()
}

/// Lines of `text` that start with `prefix`.
pub fn command_lines<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
    text.lines().filter(|l| l.starts_with(prefix)).collect()
}

/// Number of lines of `text` that start with `prefix`.
pub fn count_commands(text: &str, prefix: &str) -> usize {
    command_lines(text, prefix).len()
}
