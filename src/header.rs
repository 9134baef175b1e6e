//! One-time printer setup block.
//!
//! Emitted exactly once at the top of every program, before any page. The
//! descriptor carries `quantity='0'` so the driver treats it as setup only.

use crate::config::{LabelLayoutConfig, Position};
use crate::tspl::{Block, Command};

/// Render the setup block for `config`.
///
/// Command order is fixed: size, gap, speed, density, ribbon, direction,
/// reference, offset, peel, cutter, partial cutter.
pub fn render_header(config: &LabelLayoutConfig) -> String {
    let mut block = Block::open(0, config.height_mm);
    for command in [
        Command::Size {
            width_mm: config.width_mm,
            height_mm: config.height_mm,
        },
        Command::Gap {
            gap_mm: config.gap_mm,
        },
        Command::Speed(config.speed),
        Command::Density(config.density),
        Command::Ribbon(config.ribbon),
        Command::Direction,
        Command::Reference(Position::ORIGIN),
        Command::Offset { offset_mm: 0.0 },
        Command::Peel(false),
        Command::Cutter(false),
        Command::PartialCutter(false),
    ] {
        block.push(&command);
    }
    block.close()
}
