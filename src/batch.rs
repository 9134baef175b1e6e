//! Splits label records into physical pages.

use crate::types::LabelRecord;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("items_per_page must be a positive integer, got 0")]
    ZeroBatchSize,
}

/// Up to `items_per_page` records printed side by side on one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalPage<'a> {
    /// 0-based position of this page in the program.
    pub index: usize,
    pub records: &'a [LabelRecord],
}

/// Chunk `records` into pages of `items_per_page`, preserving input order.
///
/// Produces `ceil(len / items_per_page)` pages; only the last may be short.
/// No records means no pages.
pub fn plan(
    records: &[LabelRecord],
    items_per_page: usize,
) -> Result<Vec<PhysicalPage<'_>>, BatchError> {
    if items_per_page == 0 {
        return Err(BatchError::ZeroBatchSize);
    }
    Ok(records
        .chunks(items_per_page)
        .enumerate()
        .map(|(index, records)| PhysicalPage { index, records })
        .collect())
}
