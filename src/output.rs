//! CLI output formatting.
//!
//! The program itself goes to stdout (or a file) untouched; everything here is
//! the human-facing report printed to stderr alongside it.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! Size: small (104 x 22 mm, 4 per page)
//! Labels: 5
//! Pages: 2
//! Bytes: 1234
//! Digest: sha256:9f86d0...
//! Warning: qr_positions has 2 entries for 4 labels per page; slots 2..3 reuse slot 0
//! ```
//!
//! ## Check
//!
//! ```text
//! Size: medium (80 x 30 mm, 2 per page)
//! Config is valid
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stderr.

use crate::config::{LabelLayoutConfig, LabelSize, PositionShortfall};
use crate::template::LabelJob;
use sha2::{Digest, Sha256};

/// SHA-256 of the program bytes, as lowercase hex.
///
/// Lets a printer integration log a job once and later confirm a replayed or
/// regenerated program is byte-identical.
pub fn program_digest(program: &str) -> String {
    format!("{:x}", Sha256::digest(program.as_bytes()))
}

fn size_line(size: LabelSize, config: &LabelLayoutConfig) -> String {
    format!(
        "Size: {} ({} x {} mm, {} per page)",
        size, config.width_mm, config.height_mm, config.items_per_page
    )
}

fn warning_lines(shortfalls: &[PositionShortfall]) -> impl Iterator<Item = String> + '_ {
    shortfalls.iter().map(|s| format!("Warning: {s}"))
}

/// Summary of a rendered job.
pub fn format_render_output(size: LabelSize, config: &LabelLayoutConfig, job: &LabelJob) -> Vec<String> {
    let mut lines = vec![
        size_line(size, config),
        format!("Labels: {}", job.labels),
        format!("Pages: {}", job.pages),
        format!("Bytes: {}", job.program.len()),
        format!("Digest: sha256:{}", program_digest(&job.program)),
    ];
    lines.extend(warning_lines(&job.shortfalls));
    lines
}

/// Result of validating a config without rendering.
pub fn format_check_output(size: LabelSize, config: &LabelLayoutConfig) -> Vec<String> {
    let shortfalls = config.position_shortfalls();
    let mut lines = vec![size_line(size, config)];
    lines.extend(warning_lines(&shortfalls));
    if shortfalls.is_empty() {
        lines.push("Config is valid".to_string());
    } else {
        lines.push(format!(
            "Config is valid with {} warning(s)",
            shortfalls.len()
        ));
    }
    lines
}

pub fn print_render_output(size: LabelSize, config: &LabelLayoutConfig, job: &LabelJob) {
    for line in format_render_output(size, config, job) {
        eprintln!("{}", line);
    }
}

pub fn print_check_output(size: LabelSize, config: &LabelLayoutConfig) {
    for line in format_check_output(size, config) {
        eprintln!("{}", line);
    }
}
