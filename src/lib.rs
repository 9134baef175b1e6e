//! # TSPL Labels
//!
//! Generates complete TSPL programs for thermal label printers from a list of
//! QR inventory labels. The output is a text document streamed as-is to the
//! printer, so it has to match the firmware's command grammar exactly: a
//! misplaced quote or a missing blank line yields a blank or garbled label,
//! not a slightly wrong one.
//!
//! # Architecture: Single-Pass Transform
//!
//! ```text
//! options + size ──► config::resolve ──► LabelLayoutConfig
//!                                             │
//! records ──► batch::plan ──► pages ──► page::render_page (per page)
//!                                             │
//! header::render_header ──► header ───────────┴──► template (concatenate + end)
//! ```
//!
//! No I/O, no shared state, no caching. Identical inputs always give
//! byte-identical programs, so downstream layers can diff or replay them.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`template`] | Public entry points: per-size generators, size dispatch, job report |
//! | [`config`] | Label sizes, stock defaults, sparse option merging, validation, TOML loading |
//! | [`header`] | One-time printer setup block |
//! | [`batch`] | Chunks records into physical pages |
//! | [`page`] | QR and text commands for one physical page |
//! | [`tspl`] | Command vocabulary and page-descriptor framing |
//! | [`sanitize`] | Makes user text safe inside quoted literals |
//! | [`types`] | `LabelRecord` |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## Sizes Are an Enum
//!
//! The three stocks are a closed [`config::LabelSize`] enum, each with a fully
//! populated default config. Free-form size tags from callers go through
//! [`config::LabelSize::from_tag`], which falls back to the small stock: a
//! warehouse label job should print on the common stock rather than fail.
//!
//! ## Overlapping Slots Are Reported, Not Fixed
//!
//! `items_per_page` can be raised without extending the position tables.
//! Extra slots then print at slot 0's position. Inventing coordinates would
//! move ink on real labels, so the behaviour is kept and surfaced through
//! [`template::LabelJob::shortfalls`] and a `tracing` warning instead.
//!
//! ## Codepage Per Page
//!
//! The `CODEPAGE` directive is repeated on every physical page, immediately
//! after the first QR symbol. The target firmware scopes it to the page; it is
//! not deduplicated across pages.

pub mod batch;
pub mod config;
pub mod header;
pub mod output;
pub mod page;
pub mod sanitize;
pub mod template;
pub mod tspl;
pub mod types;

pub use config::{LabelLayoutConfig, LabelOptions, LabelSize, Position};
pub use template::{
    LabelJob, TemplateError, assemble, generate_for_size, generate_for_tag, generate_large,
    generate_medium, generate_small, render_job,
};
pub use types::LabelRecord;

#[cfg(test)]
pub(crate) mod test_helpers;
