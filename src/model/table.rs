//! Table types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    pub header_rows: u8,

    /// Table width as a percentage of the text area
    pub width_percent: u8,

    /// Outer and inner borders
    pub borders: TableBorders,
}

impl Table {
    /// Create a new empty full-width table with single-line borders.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            header_rows: 0,
            width_percent: 100,
            borders: TableBorders::all(BorderLine::single(1)),
        }
    }

    /// Create a full-width table without any visible borders.
    pub fn borderless() -> Self {
        Self {
            borders: TableBorders::none(),
            ..Self::new()
        }
    }

    /// Set the number of header rows and return self.
    pub fn with_header(mut self, header_rows: u8) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get header rows.
    pub fn header(&self) -> &[TableRow] {
        let n = (self.header_rows as usize).min(self.rows.len());
        &self.rows[..n]
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[TableRow] {
        let n = (self.header_rows as usize).min(self.rows.len());
        &self.rows[n..]
    }

    /// Column widths (percent) declared on the first row.
    pub fn column_widths(&self) -> Vec<Option<u8>> {
        self.rows
            .first()
            .map(|r| r.cells.iter().map(|c| c.width_percent).collect())
            .unwrap_or_default()
    }

    /// Check if any table or cell border is visible.
    ///
    /// Cell borders count too: a signature block has no table borders but
    /// still reports `true` for its signature lines. Use
    /// `self.borders.any_visible()` for table-level borders only.
    pub fn has_visible_borders(&self) -> bool {
        self.borders.any_visible()
            || self
                .rows
                .iter()
                .flat_map(|r| &r.cells)
                .any(|c| c.borders.as_ref().is_some_and(|b| b.any_visible()))
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,

    /// Keep the row on a single page
    pub cant_split: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
            cant_split: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            is_header: true,
            ..Self::new(cells)
        }
    }

    /// Forbid page breaks inside the row and return self.
    pub fn unsplittable(mut self) -> Self {
        self.cant_split = true;
        self
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs)
    pub content: Vec<Paragraph>,

    /// Preferred width as a percentage of the table width
    pub width_percent: Option<u8>,

    /// Per-cell borders overriding the table borders
    pub borders: Option<CellBorders>,

    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(vec![Paragraph::with_text(text)])
    }

    /// Create a cell holding one empty paragraph.
    pub fn empty() -> Self {
        Self::with_content(vec![Paragraph::new()])
    }

    /// Create a cell with multiple paragraphs.
    pub fn with_content(content: Vec<Paragraph>) -> Self {
        Self {
            content,
            width_percent: None,
            borders: None,
            vertical_alignment: VerticalAlignment::Top,
        }
    }

    /// Set width and return self.
    pub fn width(mut self, percent: u8) -> Self {
        self.width_percent = Some(percent);
        self
    }

    /// Set per-cell borders and return self.
    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    /// Set vertical alignment and return self.
    pub fn valign(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.iter().all(|p| p.is_empty())
    }

    /// Check if the cell draws a bottom line (signature line).
    pub fn has_bottom_line(&self) -> bool {
        self.borders
            .as_ref()
            .is_some_and(|b| b.bottom.is_visible())
    }
}

/// Vertical alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top alignment
    #[default]
    Top,
    /// Middle/center alignment
    Middle,
    /// Bottom alignment
    Bottom,
}

/// Border line style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No line
    #[default]
    None,
    /// Single solid line
    Single,
}

/// A single border line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderLine {
    /// Line style
    pub style: BorderStyle,

    /// Width in eighths of a point
    pub size: u8,

    /// Hex color ("000000") or "auto"
    pub color: Option<String>,
}

impl BorderLine {
    /// No border.
    pub fn none() -> Self {
        Self::default()
    }

    /// Single solid line of the given size.
    pub fn single(size: u8) -> Self {
        Self {
            style: BorderStyle::Single,
            size,
            color: None,
        }
    }

    /// Set the color and return self.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Check if the line is drawn.
    pub fn is_visible(&self) -> bool {
        self.style != BorderStyle::None
    }
}

/// Borders of a whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBorders {
    /// Top edge
    pub top: BorderLine,
    /// Bottom edge
    pub bottom: BorderLine,
    /// Left edge
    pub left: BorderLine,
    /// Right edge
    pub right: BorderLine,
    /// Lines between rows
    pub inside_horizontal: BorderLine,
    /// Lines between columns
    pub inside_vertical: BorderLine,
}

impl TableBorders {
    /// The same line on every edge.
    pub fn all(line: BorderLine) -> Self {
        Self {
            top: line.clone(),
            bottom: line.clone(),
            left: line.clone(),
            right: line.clone(),
            inside_horizontal: line.clone(),
            inside_vertical: line,
        }
    }

    /// No visible lines.
    pub fn none() -> Self {
        Self::all(BorderLine::none())
    }

    /// Check if any line is drawn.
    pub fn any_visible(&self) -> bool {
        [
            &self.top,
            &self.bottom,
            &self.left,
            &self.right,
            &self.inside_horizontal,
            &self.inside_vertical,
        ]
        .iter()
        .any(|l| l.is_visible())
    }
}

/// Borders of a single cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBorders {
    /// Top edge
    pub top: BorderLine,
    /// Bottom edge
    pub bottom: BorderLine,
    /// Left edge
    pub left: BorderLine,
    /// Right edge
    pub right: BorderLine,
}

impl CellBorders {
    /// No visible lines.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only a bottom line.
    pub fn bottom_only(line: BorderLine) -> Self {
        Self {
            bottom: line,
            ..Self::default()
        }
    }

    /// Check if any line is drawn.
    pub fn any_visible(&self) -> bool {
        self.top.is_visible()
            || self.bottom.is_visible()
            || self.left.is_visible()
            || self.right.is_visible()
    }
}
