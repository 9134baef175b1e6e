//! Label layout configuration.
//!
//! Each supported label stock ([`LabelSize`]) owns a complete default
//! [`LabelLayoutConfig`]. Callers override any subset of it with a sparse
//! [`LabelOptions`]; resolution is a shallow merge, so a field present in the
//! options replaces the default wholesale (position tables included).
//!
//! ## Units
//!
//! Page geometry (`width_mm`, `height_mm`, `gap_mm`) is in millimetres.
//! Positions are in printer dots at 203 dpi (8 dots per millimetre).
//!
//! ## Options File
//!
//! ```toml
//! # All keys are optional - anything missing keeps the size default.
//! density = 10
//! include_id_text = true
//!
//! [[qr_positions]]
//! x = 24
//! y = 24
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Position Tables
//!
//! Tables are indexed by a label's slot within its physical page. A slot past
//! the end of a table reuses slot 0's position, which overlaps labels on the
//! physical stock. That behaviour is kept as-is (changing it would move print
//! positions on real hardware); [`LabelLayoutConfig::position_shortfalls`]
//! reports it instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML render error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

// =============================================================================
// Label sizes
// =============================================================================

/// Supported label stocks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LabelSize {
    /// 104 x 22 mm roll, four labels across.
    #[default]
    Small,
    /// 80 x 30 mm roll, two labels across.
    Medium,
    /// 100 x 50 mm roll, two labels across.
    Large,
}

impl LabelSize {
    pub const ALL: [LabelSize; 3] = [LabelSize::Small, LabelSize::Medium, LabelSize::Large];

    pub fn tag(self) -> &'static str {
        match self {
            LabelSize::Small => "small",
            LabelSize::Medium => "medium",
            LabelSize::Large => "large",
        }
    }

    /// Lenient lookup: an unrecognized tag falls back to [`LabelSize::Small`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::warn!(tag, "unknown label size, falling back to small");
            LabelSize::default()
        })
    }

    /// The complete stock configuration for this size.
    pub fn defaults(self) -> LabelLayoutConfig {
        match self {
            LabelSize::Small => small_defaults(),
            LabelSize::Medium => medium_defaults(),
            LabelSize::Large => large_defaults(),
        }
    }
}

impl fmt::Display for LabelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LabelSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(LabelSize::Small),
            "medium" => Ok(LabelSize::Medium),
            "large" => Ok(LabelSize::Large),
            other => Err(ConfigError::Validation(format!(
                "unknown label size '{other}' (expected small, medium or large)"
            ))),
        }
    }
}

// =============================================================================
// Rendering parameters
// =============================================================================

/// A print position in printer dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Position for `slot`, falling back to slot 0 when the table is too short.
///
/// Returns `None` only for an empty table.
pub fn slot_position(table: &[Position], slot: usize) -> Option<Position> {
    table.get(slot).or_else(|| table.first()).copied()
}

/// Clockwise rotation accepted by TSPL for QR and text commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("rotation must be 0, 90, 180 or 270, got {other}")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// QR error-correction level (roughly 7%, 15%, 25% and 30% recovery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrErrorLevel {
    #[default]
    L,
    M,
    Q,
    H,
}

impl fmt::Display for QrErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            QrErrorLevel::L => "L",
            QrErrorLevel::M => "M",
            QrErrorLevel::Q => "Q",
            QrErrorLevel::H => "H",
        };
        f.write_str(level)
    }
}

/// QR symbol model. `M2` is the enhanced model every current reader expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QrModel {
    M1,
    #[default]
    M2,
}

impl fmt::Display for QrModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QrModel::M1 => "M1",
            QrModel::M2 => "M2",
        })
    }
}

// =============================================================================
// Resolved configuration
// =============================================================================

/// Fully-resolved configuration for one label stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelLayoutConfig {
    /// Page width in millimetres.
    pub width_mm: f64,
    /// Page height (pitch) in millimetres.
    pub height_mm: f64,
    /// Gap between pages in millimetres.
    pub gap_mm: f64,
    /// Print speed in inches per second.
    pub speed: f64,
    /// Print darkness, 0-15.
    pub density: u8,
    /// Thermal-transfer ribbon installed.
    pub ribbon: bool,
    /// Feed to the tear bar after each page.
    pub tear: bool,
    /// Character set used to interpret quoted text (e.g. `UTF-8`, `1252`).
    pub codepage: String,
    /// Labels printed side by side on one physical page.
    pub items_per_page: usize,

    pub qr_model: QrModel,
    /// QR cell width in dots, 1-10.
    pub qr_module_size: u32,
    pub qr_rotation: Rotation,
    /// Data mask pattern, 0-8.
    pub qr_mask: u8,
    pub qr_error_level: QrErrorLevel,

    /// Font for generic text (also used for id text).
    pub text_font: String,
    pub text_rotation: Rotation,
    pub text_x_scale: u32,
    pub text_y_scale: u32,

    /// Font for the label name.
    pub name_font: String,
    pub name_rotation: Rotation,
    pub name_x_scale: u32,
    pub name_y_scale: u32,

    /// Print each record's id below its name.
    pub include_id_text: bool,

    pub qr_positions: Vec<Position>,
    /// Generic text positions; used for names when `name_positions` is empty.
    pub text_positions: Vec<Position>,
    pub id_positions: Vec<Position>,
    pub name_positions: Vec<Position>,
}

impl Default for LabelLayoutConfig {
    fn default() -> Self {
        LabelSize::default().defaults()
    }
}

/// The position tables a config can consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionTable {
    Qr,
    Text,
    Name,
    Id,
}

impl fmt::Display for PositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PositionTable::Qr => "qr_positions",
            PositionTable::Text => "text_positions",
            PositionTable::Name => "name_positions",
            PositionTable::Id => "id_positions",
        })
    }
}

/// A consulted position table with fewer entries than slots per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionShortfall {
    pub table: PositionTable,
    pub entries: usize,
    pub items_per_page: usize,
}

impl fmt::Display for PositionShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries == 0 {
            write!(
                f,
                "{} is empty; all {} slots print at the origin",
                self.table, self.items_per_page
            )
        } else {
            write!(
                f,
                "{} has {} entries for {} labels per page; slots {}..{} reuse slot 0",
                self.table,
                self.entries,
                self.items_per_page,
                self.entries,
                self.items_per_page - 1
            )
        }
    }
}

impl LabelLayoutConfig {
    /// The table name text is placed from: `name_positions`, or
    /// `text_positions` when that is empty. `None` means no name text.
    pub fn name_table(&self) -> Option<(PositionTable, &[Position])> {
        if !self.name_positions.is_empty() {
            Some((PositionTable::Name, &self.name_positions))
        } else if !self.text_positions.is_empty() {
            Some((PositionTable::Text, &self.text_positions))
        } else {
            None
        }
    }

    /// Every consulted position table that is shorter than `items_per_page`.
    pub fn position_shortfalls(&self) -> Vec<PositionShortfall> {
        let mut consulted = vec![(PositionTable::Qr, self.qr_positions.as_slice())];
        if let Some(table) = self.name_table() {
            consulted.push(table);
        }
        if self.include_id_text && !self.id_positions.is_empty() {
            consulted.push((PositionTable::Id, &self.id_positions));
        }
        consulted
            .into_iter()
            .filter(|(_, positions)| positions.len() < self.items_per_page)
            .map(|(table, positions)| PositionShortfall {
                table,
                entries: positions.len(),
                items_per_page: self.items_per_page,
            })
            .collect()
    }

    /// Validate device parameters are within the ranges TSPL accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::Validation(
                "items_per_page must be at least 1".into(),
            ));
        }
        for (key, value) in [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("speed", self.speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a positive number"
                )));
            }
        }
        if !(self.gap_mm.is_finite() && self.gap_mm >= 0.0) {
            return Err(ConfigError::Validation(
                "gap_mm must not be negative".into(),
            ));
        }
        if self.density > 15 {
            return Err(ConfigError::Validation("density must be 0-15".into()));
        }
        if !(1..=10).contains(&self.qr_module_size) {
            return Err(ConfigError::Validation(
                "qr_module_size must be 1-10".into(),
            ));
        }
        if self.qr_mask > 8 {
            return Err(ConfigError::Validation("qr_mask must be 0-8".into()));
        }
        for (key, value) in [
            ("text_x_scale", self.text_x_scale),
            ("text_y_scale", self.text_y_scale),
            ("name_x_scale", self.name_x_scale),
            ("name_y_scale", self.name_y_scale),
        ] {
            if !(1..=10).contains(&value) {
                return Err(ConfigError::Validation(format!("{key} must be 1-10")));
            }
        }
        if self.codepage.is_empty() || self.codepage.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "codepage must be a single non-empty token".into(),
            ));
        }
        for (key, font) in [("text_font", &self.text_font), ("name_font", &self.name_font)] {
            if font.is_empty() || font.contains(['"', '\r', '\n']) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a non-empty name without quotes or line breaks"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Partial options and resolution
// =============================================================================

/// Sparse overrides for a [`LabelLayoutConfig`].
///
/// Every field mirrors one of the config's fields; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelOptions {
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub gap_mm: Option<f64>,
    pub speed: Option<f64>,
    pub density: Option<u8>,
    pub ribbon: Option<bool>,
    pub tear: Option<bool>,
    pub codepage: Option<String>,
    pub items_per_page: Option<usize>,
    pub qr_model: Option<QrModel>,
    pub qr_module_size: Option<u32>,
    pub qr_rotation: Option<Rotation>,
    pub qr_mask: Option<u8>,
    pub qr_error_level: Option<QrErrorLevel>,
    pub text_font: Option<String>,
    pub text_rotation: Option<Rotation>,
    pub text_x_scale: Option<u32>,
    pub text_y_scale: Option<u32>,
    pub name_font: Option<String>,
    pub name_rotation: Option<Rotation>,
    pub name_x_scale: Option<u32>,
    pub name_y_scale: Option<u32>,
    pub include_id_text: Option<bool>,
    pub qr_positions: Option<Vec<Position>>,
    pub text_positions: Option<Vec<Position>>,
    pub id_positions: Option<Vec<Position>>,
    pub name_positions: Option<Vec<Position>>,
}

// Lists every field once so a field added to one struct but not the other
// fails to compile.
macro_rules! overlay {
    ($options:expr, $base:expr, { $($field:ident),+ $(,)? }) => {{
        let options = $options;
        let base = $base;
        LabelLayoutConfig {
            $($field: options.$field.clone().unwrap_or(base.$field),)+
        }
    }};
}

impl LabelOptions {
    /// Shallow-merge these options over `base`.
    pub fn apply(&self, base: LabelLayoutConfig) -> LabelLayoutConfig {
        overlay!(self, base, {
            width_mm,
            height_mm,
            gap_mm,
            speed,
            density,
            ribbon,
            tear,
            codepage,
            items_per_page,
            qr_model,
            qr_module_size,
            qr_rotation,
            qr_mask,
            qr_error_level,
            text_font,
            text_rotation,
            text_x_scale,
            text_y_scale,
            name_font,
            name_rotation,
            name_x_scale,
            name_y_scale,
            include_id_text,
            qr_positions,
            text_positions,
            id_positions,
            name_positions,
        })
    }
}

/// Resolve the configuration for `size` with `options` applied on top.
///
/// Performs no validation; `items_per_page` in particular may be overridden
/// independently of the position tables.
pub fn resolve(size: LabelSize, options: &LabelOptions) -> LabelLayoutConfig {
    options.apply(size.defaults())
}

/// Load sparse options from a TOML file.
pub fn load_options(path: &Path) -> Result<LabelOptions, ConfigError> {
    let content = fs::read_to_string(path)?;
    let options: LabelOptions = toml::from_str(&content)?;
    Ok(options)
}

/// Resolve and validate the config for `size`, optionally overlaid with an
/// options file.
pub fn load_config(size: LabelSize, options_path: Option<&Path>) -> Result<LabelLayoutConfig, ConfigError> {
    let options = match options_path {
        Some(path) => load_options(path)?,
        None => LabelOptions::default(),
    };
    let config = resolve(size, &options);
    config.validate()?;
    Ok(config)
}

/// Stock configuration for `size` as a TOML document, with a short preamble.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml(size: LabelSize) -> Result<String, ConfigError> {
    let body = toml::to_string(&size.defaults())?;
    Ok(format!(
        "# tspl-labels stock configuration: {size}\n\
         # All keys are optional in an options file; remove the ones you keep as-is.\n\
         # Millimetres for page geometry, printer dots (203 dpi) for positions.\n\
         \n{body}"
    ))
}

// =============================================================================
// Stock defaults
// =============================================================================

/// `count` positions spaced `pitch` dots apart, starting at `(x, y)`.
fn row(count: u32, x: u32, y: u32, pitch: u32) -> Vec<Position> {
    (0..count).map(|column| Position::new(x + column * pitch, y)).collect()
}

fn common_defaults() -> LabelLayoutConfig {
    LabelLayoutConfig {
        width_mm: 0.0,
        height_mm: 0.0,
        gap_mm: 0.0,
        speed: 4.0,
        density: 8,
        ribbon: false,
        tear: true,
        codepage: "UTF-8".to_string(),
        items_per_page: 1,
        qr_model: QrModel::M2,
        qr_module_size: 4,
        qr_rotation: Rotation::Deg0,
        qr_mask: 7,
        qr_error_level: QrErrorLevel::L,
        text_font: "1".to_string(),
        text_rotation: Rotation::Deg0,
        text_x_scale: 1,
        text_y_scale: 1,
        name_font: "2".to_string(),
        name_rotation: Rotation::Deg0,
        name_x_scale: 1,
        name_y_scale: 1,
        include_id_text: false,
        qr_positions: Vec::new(),
        text_positions: Vec::new(),
        id_positions: Vec::new(),
        name_positions: Vec::new(),
    }
}

fn small_defaults() -> LabelLayoutConfig {
    LabelLayoutConfig {
        width_mm: 104.0,
        height_mm: 22.0,
        gap_mm: 3.0,
        items_per_page: 4,
        qr_module_size: 3,
        qr_positions: row(4, 16, 16, 208),
        text_positions: row(4, 16, 148, 208),
        id_positions: row(4, 16, 148, 208),
        name_positions: row(4, 16, 120, 208),
        ..common_defaults()
    }
}

fn medium_defaults() -> LabelLayoutConfig {
    LabelLayoutConfig {
        width_mm: 80.0,
        height_mm: 30.0,
        gap_mm: 2.0,
        items_per_page: 2,
        qr_module_size: 4,
        qr_positions: row(2, 24, 24, 320),
        text_positions: row(2, 150, 90, 320),
        id_positions: row(2, 150, 90, 320),
        name_positions: row(2, 150, 40, 320),
        ..common_defaults()
    }
}

fn large_defaults() -> LabelLayoutConfig {
    LabelLayoutConfig {
        width_mm: 100.0,
        height_mm: 50.0,
        gap_mm: 3.0,
        speed: 3.0,
        density: 10,
        items_per_page: 2,
        qr_module_size: 6,
        text_font: "2".to_string(),
        name_font: "3".to_string(),
        qr_positions: row(2, 30, 30, 400),
        text_positions: row(2, 30, 340, 400),
        id_positions: row(2, 30, 340, 400),
        name_positions: row(2, 30, 300, 400),
        ..common_defaults()
    }
}
