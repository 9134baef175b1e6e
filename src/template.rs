//! Program assembly: header, content pages, end-of-document markup.
//!
//! The only externally meaningful entry points live here. Everything is a pure
//! function of its inputs: identical records, size and options always produce
//! byte-identical programs.

use crate::batch::{self, BatchError};
use crate::config::{self, LabelLayoutConfig, LabelOptions, LabelSize, PositionShortfall};
use crate::header::render_header;
use crate::page::render_page;
use crate::tspl::END_OF_DOCUMENT;
use crate::types::LabelRecord;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// A rendered program plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelJob {
    /// Complete TSPL program, ending with the end-of-document markup.
    pub program: String,
    /// Physical pages in the program.
    pub pages: usize,
    /// Logical labels in the program.
    pub labels: usize,
    /// Position tables too short for `items_per_page`. Output is unaffected;
    /// the overflowing slots print on top of slot 0.
    pub shortfalls: Vec<PositionShortfall>,
}

/// Render `records` with an already-resolved `config`.
pub fn render_job(
    records: &[LabelRecord],
    config: &LabelLayoutConfig,
) -> Result<LabelJob, TemplateError> {
    let pages = batch::plan(records, config.items_per_page)?;

    if let Err(err) = config.validate() {
        tracing::warn!(%err, "rendering with out-of-range printer settings");
    }

    let shortfalls = config.position_shortfalls();
    for shortfall in &shortfalls {
        tracing::warn!(%shortfall, "position table shorter than items_per_page");
    }

    let mut program = render_header(config);
    for page in &pages {
        program.push_str(&render_page(page, config));
    }
    program.push_str(END_OF_DOCUMENT);

    tracing::debug!(
        labels = records.len(),
        pages = pages.len(),
        bytes = program.len(),
        "rendered label program"
    );

    Ok(LabelJob {
        program,
        pages: pages.len(),
        labels: records.len(),
        shortfalls,
    })
}

/// Resolve `options` against the defaults for `size` and render `records`.
pub fn assemble(
    records: &[LabelRecord],
    size: LabelSize,
    options: &LabelOptions,
) -> Result<String, TemplateError> {
    let config = config::resolve(size, options);
    render_job(records, &config).map(|job| job.program)
}

/// Program for the small stock (four labels per page by default).
pub fn generate_small(records: &[LabelRecord], options: &LabelOptions) -> Result<String, TemplateError> {
    assemble(records, LabelSize::Small, options)
}

/// Program for the medium stock (two labels per page by default).
pub fn generate_medium(records: &[LabelRecord], options: &LabelOptions) -> Result<String, TemplateError> {
    assemble(records, LabelSize::Medium, options)
}

/// Program for the large stock (two labels per page by default).
pub fn generate_large(records: &[LabelRecord], options: &LabelOptions) -> Result<String, TemplateError> {
    assemble(records, LabelSize::Large, options)
}

/// Dispatch to the generator for `size`.
pub fn generate_for_size(
    size: LabelSize,
    records: &[LabelRecord],
    options: &LabelOptions,
) -> Result<String, TemplateError> {
    match size {
        LabelSize::Small => generate_small(records, options),
        LabelSize::Medium => generate_medium(records, options),
        LabelSize::Large => generate_large(records, options),
    }
}

/// Dispatch on a free-form size tag; unknown tags print on the small stock.
pub fn generate_for_tag(
    tag: &str,
    records: &[LabelRecord],
    options: &LabelOptions,
) -> Result<String, TemplateError> {
    generate_for_size(LabelSize::from_tag(tag), records, options)
}
