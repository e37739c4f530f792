//! Signature block tables.
//!
//! Both layouts are two-row borderless tables: the first row draws the
//! signature lines as cell bottom borders, the second row holds small
//! italic captions under them.

use crate::model::{
    Alignment, BorderLine, CellBorders, Paragraph, Table, TableCell, TableRow, TextRun,
};

/// Column widths of both signature layouts, in percent.
const WIDTHS: [u8; 5] = [40, 5, 15, 5, 25];

const CAPTION_SIZE: f32 = 9.0;
const ROLE_SIZE: f32 = 12.0;

fn signature_line() -> BorderLine {
    BorderLine::single(4).color("000000")
}

fn caption(text: &str) -> Paragraph {
    if text.is_empty() {
        return Paragraph::new();
    }
    Paragraph::with_run(TextRun::italic(text).with_size(CAPTION_SIZE)).align(Alignment::Center)
}

fn caption_row(captions: [&str; 5]) -> TableRow {
    let cells = captions
        .into_iter()
        .map(|text| TableCell::with_content(vec![caption(text)]).borders(CellBorders::none()))
        .collect();
    TableRow::new(cells).unsplittable()
}

fn line_cell(index: usize, lined: bool, content: Paragraph) -> TableCell {
    let borders = if lined {
        CellBorders::bottom_only(signature_line())
    } else {
        CellBorders::none()
    };
    TableCell::with_content(vec![content])
        .width(WIDTHS[index])
        .borders(borders)
}

/// Signature block of the inspecting specialist: lines for position,
/// signature and name.
pub fn inspector_block() -> Table {
    let first = (0..WIDTHS.len())
        .map(|i| line_cell(i, matches!(i, 0 | 2 | 4), Paragraph::new()))
        .collect();

    let mut table = Table::borderless();
    table.add_row(TableRow::new(first).unsplittable());
    table.add_row(caption_row([
        "(должность специалиста строительного контроля)",
        "",
        "(подпись)",
        "",
        "(расшифровка подписи)",
    ]));
    table
}

/// Signature block of a contractor party: the role label on the left, lines
/// for signature and name.
pub fn party_block(role: &str) -> Table {
    let first = (0..WIDTHS.len())
        .map(|i| {
            let content = if i == 0 {
                Paragraph::with_run(TextRun::new(role).with_size(ROLE_SIZE)).align(Alignment::Left)
            } else {
                Paragraph::new()
            };
            line_cell(i, matches!(i, 2 | 4), content)
        })
        .collect();

    let mut table = Table::borderless();
    table.add_row(TableRow::new(first).unsplittable());
    table.add_row(caption_row(["", "", "(подпись)", "", "(расшифровка подписи)"]));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lined_columns(table: &Table) -> Vec<usize> {
        table.rows[0]
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_bottom_line())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_inspector_block_layout() {
        let table = inspector_block();
        assert_eq!(table.row_count(), 2);
        assert!(!table.borders.any_visible());
        assert!(table.has_visible_borders());
        assert!(table.rows.iter().all(|r| r.cant_split));
        assert_eq!(lined_columns(&table), vec![0, 2, 4]);
        assert_eq!(
            table.column_widths(),
            vec![Some(40), Some(5), Some(15), Some(5), Some(25)]
        );
        assert_eq!(
            table.rows[1].cells[0].plain_text(),
            "(должность специалиста строительного контроля)"
        );
    }

    #[test]
    fn test_party_block_layout() {
        let table = party_block("Представитель подрядчика");
        assert_eq!(lined_columns(&table), vec![2, 4]);
        assert_eq!(table.rows[0].cells[0].plain_text(), "Представитель подрядчика");
        assert_eq!(table.rows[1].cells[0].plain_text(), "");
        assert_eq!(table.rows[1].cells[4].plain_text(), "(расшифровка подписи)");

        let caption = table.rows[1].cells[2].content[0].runs().next().unwrap();
        assert!(caption.style.italic);
        assert_eq!(caption.style.font_size, Some(9.0));
    }
}
