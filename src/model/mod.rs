//! Document model types for the composed notice.
//!
//! This module defines the intermediate representation (IR) that bridges
//! notice composition and the final container codec. The model is a tree of
//! sections, paragraphs, tables, cells and styled runs; it carries layout
//! attributes (margins, widths, borders) but knows nothing about any file
//! format.

mod document;
mod paragraph;
mod resource;
mod section;
mod table;

pub use document::{Document, Metadata, RunDefaults};
pub use paragraph::{Alignment, InlineContent, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use resource::{DisplaySize, ImageFormat, ImageOrigin, ImageResource};
pub use section::{Block, PageMargins, Section};
pub use table::{
    BorderLine, BorderStyle, CellBorders, Table, TableBorders, TableCell, TableRow,
    VerticalAlignment,
};
