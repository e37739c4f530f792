//! Section-level types.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A document section: a run of pages sharing the same page setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Page margins
    pub margins: PageMargins,

    /// Content blocks in the section
    pub blocks: Vec<Block>,
}

impl Section {
    /// Create a new empty section with the given margins.
    pub fn new(margins: PageMargins) -> Self {
        Self {
            margins,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the section.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a paragraph to the section.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the section.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Iterate over the tables of the section.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Iterate over the top-level paragraphs of the section.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Get plain text content of the section.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => p.plain_text(),
                Block::Table(t) => t.plain_text(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the section is empty (no content blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks in the section.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new(PageMargins::default())
    }
}

/// Page margins in twips (1/1440 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMargins {
    /// Left margin
    pub left: u32,
    /// Right margin
    pub right: u32,
    /// Top margin
    pub top: u32,
    /// Bottom margin
    pub bottom: u32,
}

impl PageMargins {
    /// Notice layout: 20 mm binding margin on the left, 10 mm elsewhere.
    pub const NOTICE: PageMargins = PageMargins {
        left: 1134,
        right: 567,
        top: 567,
        bottom: 567,
    };
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::NOTICE
    }
}

/// A content block in a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),
}

impl Block {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Get the paragraph if this block is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Get the table if this block is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }
}
