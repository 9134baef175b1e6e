//! TSPL command vocabulary and block framing.
//!
//! A generated program is a flat sequence of blocks. Each block is wrapped in
//! an `xpml` page descriptor, the markup TSC drivers emit around every page:
//!
//! ```text
//! <xpml><page quantity='1' pitch='22.0 mm'></xpml>SET TEAR ON
//!
//! CLS
//!
//! PRINT 1,1
//!
//! <xpml></page></xpml>
//! ```
//!
//! The first command shares a line with the opening descriptor, every command
//! is followed by one blank line, and the closing descriptor ends the block
//! with no trailing newline. Blocks are concatenated directly, and the whole
//! program ends with [`END_OF_DOCUMENT`].
//!
//! Quoted arguments are written verbatim; callers pass values through
//! [`crate::sanitize::sanitize`] first.

use crate::config::{Position, QrErrorLevel, QrModel, Rotation};
use std::fmt;

/// Closing markup of a whole program.
pub const END_OF_DOCUMENT: &str = "<xpml><end/></xpml>";

/// Closing page descriptor of one block.
pub const PAGE_CLOSE: &str = "<xpml></page></xpml>";

/// QR input mode: let the printer pick numeric/alphanumeric/byte encoding.
const QR_AUTO_MODE: char = 'A';

/// Opening page descriptor. `quantity` 0 marks a setup-only block.
pub fn page_open(quantity: u32, pitch_mm: f64) -> String {
    format!("<xpml><page quantity='{quantity}' pitch='{pitch_mm:.1} mm'></xpml>")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// One TSPL command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Size { width_mm: f64, height_mm: f64 },
    Gap { gap_mm: f64 },
    Speed(f64),
    Density(u8),
    Ribbon(bool),
    Direction,
    Reference(Position),
    Offset { offset_mm: f64 },
    Peel(bool),
    Cutter(bool),
    PartialCutter(bool),
    Tear(bool),
    Cls,
    QrCode {
        at: Position,
        level: QrErrorLevel,
        cell_width: u32,
        rotation: Rotation,
        model: QrModel,
        mask: u8,
        data: &'a str,
    },
    Codepage(&'a str),
    Text {
        at: Position,
        font: &'a str,
        rotation: Rotation,
        x_scale: u32,
        y_scale: u32,
        content: &'a str,
    },
    Print { sets: u32, copies: u32 },
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Size {
                width_mm,
                height_mm,
            } => write!(f, "SIZE {width_mm} mm, {height_mm} mm"),
            Command::Gap { gap_mm } => write!(f, "GAP {gap_mm} mm, 0 mm"),
            Command::Speed(speed) => write!(f, "SPEED {speed}"),
            Command::Density(density) => write!(f, "DENSITY {density}"),
            Command::Ribbon(on) => write!(f, "SET RIBBON {}", on_off(*on)),
            Command::Direction => f.write_str("DIRECTION 0,0"),
            Command::Reference(at) => write!(f, "REFERENCE {},{}", at.x, at.y),
            Command::Offset { offset_mm } => write!(f, "OFFSET {offset_mm} mm"),
            Command::Peel(on) => write!(f, "SET PEEL {}", on_off(*on)),
            Command::Cutter(on) => write!(f, "SET CUTTER {}", on_off(*on)),
            Command::PartialCutter(on) => write!(f, "SET PARTIAL_CUTTER {}", on_off(*on)),
            Command::Tear(on) => write!(f, "SET TEAR {}", on_off(*on)),
            Command::Cls => f.write_str("CLS"),
            Command::QrCode {
                at,
                level,
                cell_width,
                rotation,
                model,
                mask,
                data,
            } => write!(
                f,
                "QRCODE {},{},{level},{cell_width},{QR_AUTO_MODE},{rotation},{model},S{mask},\"{data}\"",
                at.x, at.y
            ),
            Command::Codepage(codepage) => write!(f, "CODEPAGE {codepage}"),
            Command::Text {
                at,
                font,
                rotation,
                x_scale,
                y_scale,
                content,
            } => write!(
                f,
                "TEXT {},{},\"{font}\",{rotation},{x_scale},{y_scale},\"{content}\"",
                at.x, at.y
            ),
            Command::Print { sets, copies } => write!(f, "PRINT {sets},{copies}"),
        }
    }
}

/// Accumulates the commands of one page-descriptor block.
#[derive(Debug)]
pub struct Block {
    buf: String,
    empty: bool,
}

impl Block {
    pub fn open(quantity: u32, pitch_mm: f64) -> Self {
        Self {
            buf: page_open(quantity, pitch_mm),
            empty: true,
        }
    }

    pub fn push(&mut self, command: &Command<'_>) {
        if !self.empty {
            self.buf.push_str("\n\n");
        }
        self.buf.push_str(&command.to_string());
        self.empty = false;
    }

    /// Close the block. The result has no trailing newline.
    pub fn close(mut self) -> String {
        if !self.empty {
            self.buf.push_str("\n\n");
        }
        self.buf.push_str(PAGE_CLOSE);
        self.buf
    }
}
