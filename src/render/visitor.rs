//! Visitor pattern for inspecting and customizing document rendering.
//!
//! # Example
//!
//! ```
//! use noticedoc::render::visitor::{DocumentVisitor, VisitorAction};
//! use noticedoc::model::Table;
//!
//! struct HideSignatures;
//!
//! impl DocumentVisitor for HideSignatures {
//!     fn visit_table(&mut self, table: &Table) -> VisitorAction {
//!         if table.has_visible_borders() && !table.borders.any_visible() {
//!             VisitorAction::Skip
//!         } else {
//!             VisitorAction::Continue
//!         }
//!     }
//! }
//! ```

use crate::model::{Block, Document, InlineContent, Paragraph, Table};

use super::DocumentStats;

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the element with custom output.
    Replace(String),

    /// Skip this element entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the element should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting document elements.
///
/// All methods return `VisitorAction::Continue` by default.
pub trait DocumentVisitor: Send + Sync {
    /// Called before a top-level paragraph.
    fn visit_paragraph(&mut self, para: &Paragraph) -> VisitorAction {
        let _ = para;
        VisitorAction::Continue
    }

    /// Called before a table.
    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        let _ = table;
        VisitorAction::Continue
    }

    /// Called before an inline image.
    ///
    /// # Arguments
    /// * `id` - Resource ID (logical photo name)
    /// * `width`, `height` - Display size
    fn visit_image(&mut self, id: &str, width: u32, height: u32) -> VisitorAction {
        let _ = (id, width, height);
        VisitorAction::Continue
    }

    /// Called at the start of a section.
    ///
    /// # Arguments
    /// * `index` - Zero-based section index
    fn on_section_start(&mut self, index: usize) {
        let _ = index;
    }

    /// Called at the end of a section.
    fn on_section_end(&mut self, index: usize) {
        let _ = index;
    }
}

/// Walk a document, calling the visitor for every section, top-level block
/// and inline image, in document order.
///
/// The returned actions are ignored; use this for inspection.
pub fn walk(doc: &Document, visitor: &mut dyn DocumentVisitor) {
    for (index, section) in doc.sections.iter().enumerate() {
        visitor.on_section_start(index);
        for block in &section.blocks {
            match block {
                Block::Paragraph(p) => {
                    visitor.visit_paragraph(p);
                    for item in &p.content {
                        if let InlineContent::Image {
                            resource_id,
                            width,
                            height,
                        } = item
                        {
                            visitor.visit_image(resource_id, *width, *height);
                        }
                    }
                }
                Block::Table(t) => {
                    visitor.visit_table(t);
                }
            }
        }
        visitor.on_section_end(index);
    }
}

/// Default visitor that performs no customization.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentVisitor for DefaultVisitor {}

/// Visitor that skips all images.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl DocumentVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _id: &str, _width: u32, _height: u32) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that converts tables to simple pipe-separated text.
#[derive(Debug, Clone, Default)]
pub struct SimpleTableVisitor;

impl DocumentVisitor for SimpleTableVisitor {
    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        let mut output = String::new();
        for row in &table.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| c.plain_text().replace('\n', " "))
                .collect();
            output.push_str(&cells.join(" | "));
            output.push('\n');
        }
        output.push('\n');
        VisitorAction::Replace(output)
    }
}

/// Visitor collecting [`DocumentStats`].
#[derive(Debug, Clone, Default)]
pub struct StatsVisitor {
    stats: DocumentStats,
}

impl StatsVisitor {
    /// Create a new stats visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected statistics.
    pub fn stats(&self) -> &DocumentStats {
        &self.stats
    }

    /// Consume the visitor and return the statistics.
    pub fn into_stats(self) -> DocumentStats {
        self.stats
    }
}

impl DocumentVisitor for StatsVisitor {
    fn visit_paragraph(&mut self, para: &Paragraph) -> VisitorAction {
        if !para.plain_text().trim().is_empty() {
            self.stats.add_paragraph();
            self.stats.count_text(&para.plain_text());
        }
        VisitorAction::Continue
    }

    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        self.stats.add_table(table.row_count());
        self.stats.count_text(&table.plain_text());
        VisitorAction::Continue
    }

    fn visit_image(&mut self, _id: &str, _width: u32, _height: u32) -> VisitorAction {
        self.stats.add_image();
        VisitorAction::Continue
    }

    fn on_section_start(&mut self, _index: usize) {
        self.stats.add_section();
    }
}

/// Collect statistics of a document.
pub fn collect_stats(doc: &Document) -> DocumentStats {
    let mut visitor = StatsVisitor::new();
    walk(doc, &mut visitor);
    visitor.into_stats()
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn DocumentVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: DocumentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }
}

impl Default for CompositeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentVisitor for CompositeVisitor {
    fn visit_paragraph(&mut self, para: &Paragraph) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_paragraph(para);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }

    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_table(table);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }

    fn visit_image(&mut self, id: &str, width: u32, height: u32) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_image(id, width, height);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }

    fn on_section_start(&mut self, index: usize) {
        for visitor in &mut self.visitors {
            visitor.on_section_start(index);
        }
    }

    fn on_section_end(&mut self, index: usize) {
        for visitor in &mut self.visitors {
            visitor.on_section_end(index);
        }
    }
}
