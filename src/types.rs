//! Shared types passed between the planner, the page generator and the CLI.

use serde::{Deserialize, Serialize};

/// One logical label: a QR symbol plus its human-readable text.
///
/// Built by the caller from inventory data; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    /// Data encoded in the QR symbol (application-defined convention).
    #[serde(alias = "qrPayload")]
    pub qr_payload: String,
    /// Display name printed next to the symbol.
    pub name: String,
    /// Inventory identifier, printed only when id text is enabled.
    #[serde(default)]
    pub id: String,
}

impl LabelRecord {
    pub fn new(
        qr_payload: impl Into<String>,
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            qr_payload: qr_payload.into(),
            name: name.into(),
            id: id.into(),
        }
    }
}
