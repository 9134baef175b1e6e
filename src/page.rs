//! Content block for one physical page.
//!
//! Per slot the block carries a QR symbol and the record's name (plus its id
//! when enabled). The codepage directive is page-scoped on the target firmware,
//! so it is re-asserted on every page, once, right after the first QR command.

use crate::batch::PhysicalPage;
use crate::config::{LabelLayoutConfig, Position, slot_position};
use crate::sanitize::sanitize;
use crate::tspl::{Block, Command};

/// Render one physical page of labels.
pub fn render_page(page: &PhysicalPage<'_>, config: &LabelLayoutConfig) -> String {
    let mut block = Block::open(1, config.height_mm);
    block.push(&Command::Tear(config.tear));
    block.push(&Command::Cls);

    let name_font = sanitize(&config.name_font);
    let text_font = sanitize(&config.text_font);
    let codepage = codepage_token(&config.codepage);

    let name_table = config.name_table().map(|(_, positions)| positions);
    let id_table = (config.include_id_text && !config.id_positions.is_empty())
        .then_some(config.id_positions.as_slice());

    for (slot, record) in page.records.iter().enumerate() {
        let qr_at = slot_position(&config.qr_positions, slot).unwrap_or(Position::ORIGIN);
        let payload = sanitize(&record.qr_payload);
        block.push(&Command::QrCode {
            at: qr_at,
            level: config.qr_error_level,
            cell_width: config.qr_module_size,
            rotation: config.qr_rotation,
            model: config.qr_model,
            mask: config.qr_mask,
            data: &payload,
        });

        if slot == 0 {
            block.push(&Command::Codepage(&codepage));
        }

        if let Some(at) = name_table.and_then(|table| slot_position(table, slot)) {
            let name = sanitize(&record.name);
            block.push(&Command::Text {
                at,
                font: &name_font,
                rotation: config.name_rotation,
                x_scale: config.name_x_scale,
                y_scale: config.name_y_scale,
                content: &name,
            });
        }

        if let Some(at) = id_table.and_then(|table| slot_position(table, slot)) {
            let id = sanitize(&record.id);
            block.push(&Command::Text {
                at,
                font: &text_font,
                rotation: config.text_rotation,
                x_scale: config.text_x_scale,
                y_scale: config.text_y_scale,
                content: &id,
            });
        }
    }

    block.push(&Command::Print { sets: 1, copies: 1 });
    tracing::trace!(page = page.index, labels = page.records.len(), "rendered page");
    block.close()
}

/// The codepage argument is unquoted, so only its first token is kept.
fn codepage_token(codepage: &str) -> String {
    sanitize(codepage)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LabelOptions, LabelSize, resolve};
    use crate::test_helpers::{command_lines, count_commands, records};
    use crate::types::LabelRecord;

    fn page(records: &[LabelRecord]) -> PhysicalPage<'_> {
        PhysicalPage { index: 0, records }
    }

    #[test]
    fn single_label_medium_exact() {
        let input = [LabelRecord::new("SKU-1", "Bolt", "1")];
        let text = render_page(&page(&input), &LabelSize::Medium.defaults());
        let expected = "<xpml><page quantity='1' pitch='30.0 mm'></xpml>SET TEAR ON\n\
                        \n\
                        CLS\n\
                        \n\
                        QRCODE 24,24,L,4,A,0,M2,S7,\"SKU-1\"\n\
                        \n\
                        CODEPAGE UTF-8\n\
                        \n\
                        TEXT 150,40,\"2\",0,1,1,\"Bolt\"\n\
                        \n\
                        PRINT 1,1\n\
                        \n\
                        <xpml></page></xpml>";
        assert_eq!(text, expected);
    }

    #[test]
    fn full_small_page_uses_each_slot_position() {
        let input = records(4);
        let text = render_page(&page(&input), &LabelSize::Small.defaults());
        let qr: Vec<&str> = command_lines(&text, "QRCODE ");
        assert_eq!(
            qr,
            vec![
                "QRCODE 16,16,L,3,A,0,M2,S7,\"QR-1\"",
                "QRCODE 224,16,L,3,A,0,M2,S7,\"QR-2\"",
                "QRCODE 432,16,L,3,A,0,M2,S7,\"QR-3\"",
                "QRCODE 640,16,L,3,A,0,M2,S7,\"QR-4\"",
            ]
        );
        let names: Vec<&str> = command_lines(&text, "TEXT ");
        assert_eq!(names[3], "TEXT 640,120,\"2\",0,1,1,\"Item 4\"");
    }

    #[test]
    fn slot_commands_are_interleaved() {
        let input = records(2);
        let text = render_page(&page(&input), &LabelSize::Medium.defaults());
        let kinds: Vec<&str> = text
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.split(' ').next().unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "<xpml><page",
                "CLS",
                "QRCODE",
                "CODEPAGE",
                "TEXT",
                "QRCODE",
                "TEXT",
                "PRINT",
                "<xpml></page></xpml>",
            ]
        );
    }

    #[test]
    fn codepage_once_per_page() {
        let input = records(4);
        let text = render_page(&page(&input), &LabelSize::Small.defaults());
        assert_eq!(count_commands(&text, "CODEPAGE "), 1);
    }

    #[test]
    fn tear_off_is_honoured() {
        let options = LabelOptions {
            tear: Some(false),
            ..Default::default()
        };
        let text = render_page(&page(&records(1)), &resolve(LabelSize::Small, &options));
        assert!(text.contains("></xpml>SET TEAR OFF\n"));
    }

    #[test]
    fn short_tables_fall_back_to_slot_zero() {
        let options = LabelOptions {
            items_per_page: Some(3),
            ..Default::default()
        };
        let config = resolve(LabelSize::Medium, &options);
        let input = records(3);
        let text = render_page(&page(&input), &config);
        let qr = command_lines(&text, "QRCODE ");
        assert!(qr[2].starts_with("QRCODE 24,24,"));
        let names = command_lines(&text, "TEXT ");
        assert!(names[2].starts_with("TEXT 150,40,"));
    }

    #[test]
    fn empty_qr_table_prints_at_origin() {
        let options = LabelOptions {
            qr_positions: Some(Vec::new()),
            ..Default::default()
        };
        let text = render_page(&page(&records(1)), &resolve(LabelSize::Small, &options));
        assert_eq!(command_lines(&text, "QRCODE ")[0], "QRCODE 0,0,L,3,A,0,M2,S7,\"QR-1\"");
        assert_eq!(count_commands(&text, "CODEPAGE "), 1);
    }

    #[test]
    fn name_text_uses_generic_positions_when_name_table_empty() {
        let options = LabelOptions {
            name_positions: Some(Vec::new()),
            ..Default::default()
        };
        let text = render_page(&page(&records(2)), &resolve(LabelSize::Small, &options));
        let names = command_lines(&text, "TEXT ");
        assert_eq!(names[1], "TEXT 224,148,\"2\",0,1,1,\"Item 2\"");
    }

    #[test]
    fn no_text_tables_no_text_commands() {
        let options = LabelOptions {
            name_positions: Some(Vec::new()),
            text_positions: Some(Vec::new()),
            ..Default::default()
        };
        let text = render_page(&page(&records(2)), &resolve(LabelSize::Small, &options));
        assert_eq!(count_commands(&text, "TEXT "), 0);
        assert_eq!(count_commands(&text, "QRCODE "), 2);
    }

    #[test]
    fn id_text_opt_in_uses_generic_style() {
        let options = LabelOptions {
            include_id_text: Some(true),
            text_x_scale: Some(2),
            ..Default::default()
        };
        let input = [LabelRecord::new("p", "Nut", "INV-\"7\"")];
        let text = render_page(&page(&input), &resolve(LabelSize::Large, &options));
        let texts = command_lines(&text, "TEXT ");
        assert_eq!(
            texts,
            vec![
                "TEXT 30,300,\"3\",0,1,1,\"Nut\"",
                "TEXT 30,340,\"2\",0,2,1,\"INV-'7'\"",
            ]
        );
    }

    #[test]
    fn id_text_off_by_default() {
        let text = render_page(&page(&records(2)), &LabelSize::Large.defaults());
        assert_eq!(count_commands(&text, "TEXT "), 2);
    }

    #[test]
    fn values_are_sanitized() {
        let input = [LabelRecord::new("a\r\nb", "Widget \"Pro\"", "")];
        let text = render_page(&page(&input), &LabelSize::Small.defaults());
        assert!(text.contains(",\"a b\"\n"));
        assert!(text.contains(",\"Widget 'Pro'\"\n"));
    }

    #[test]
    fn quoted_fonts_cannot_break_literals() {
        let options = LabelOptions {
            name_font: Some("A\"B".to_string()),
            text_font: Some("C\nD".to_string()),
            include_id_text: Some(true),
            ..Default::default()
        };
        let text = render_page(&page(&records(1)), &resolve(LabelSize::Small, &options));
        let texts = command_lines(&text, "TEXT ");
        assert_eq!(texts[0], "TEXT 16,120,\"A'B\",0,1,1,\"Item 1\"");
        assert_eq!(texts[1], "TEXT 16,148,\"C D\",0,1,1,\"ID-1\"");
        for line in text.lines() {
            assert_eq!(line.matches('"').count() % 2, 0, "unbalanced quotes: {line}");
        }
    }

    #[test]
    fn codepage_cannot_inject_commands() {
        let options = LabelOptions {
            codepage: Some("UTF-8\nPRINT 9,9".to_string()),
            ..Default::default()
        };
        let text = render_page(&page(&records(2)), &resolve(LabelSize::Small, &options));
        assert_eq!(command_lines(&text, "CODEPAGE "), vec!["CODEPAGE UTF-8"]);
        assert_eq!(count_commands(&text, "PRINT "), 1);
    }

    #[test]
    fn codepage_token_keeps_first_word() {
        assert_eq!(codepage_token("1252"), "1252");
        assert_eq!(codepage_token(" UTF-8 extra"), "UTF-8");
        assert_eq!(codepage_token("\r\n"), "");
    }

    #[test]
    fn qr_rendering_options_flow_through() {
        let options = LabelOptions {
            qr_error_level: Some(crate::config::QrErrorLevel::H),
            qr_rotation: Some(crate::config::Rotation::Deg270),
            qr_mask: Some(0),
            qr_model: Some(crate::config::QrModel::M1),
            qr_module_size: Some(8),
            ..Default::default()
        };
        let text = render_page(&page(&records(1)), &resolve(LabelSize::Small, &options));
        assert_eq!(
            command_lines(&text, "QRCODE ")[0],
            "QRCODE 16,16,H,8,A,270,M1,S0,\"QR-1\""
        );
    }
}
