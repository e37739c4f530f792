//! Plain text rendering of the document IR.

use crate::error::Result;
use crate::model::{Block, Document, InlineContent};

/// Convert a document to plain text.
///
/// Sections are separated by a form feed; images appear as
/// `[image: <name>]` placeholders.
pub fn to_text(doc: &Document) -> Result<String> {
    let mut sections = Vec::with_capacity(doc.sections.len());
    for section in &doc.sections {
        let mut lines = Vec::new();
        for block in &section.blocks {
            match block {
                Block::Paragraph(p) => {
                    let mut line = String::new();
                    for item in &p.content {
                        match item {
                            InlineContent::Text(run) => line.push_str(&run.text),
                            InlineContent::LineBreak => line.push('\n'),
                            InlineContent::Image { resource_id, .. } => {
                                line.push_str(&format!("[image: {}]", resource_id))
                            }
                        }
                    }
                    lines.push(line.trim_end().to_string());
                }
                Block::Table(t) => lines.push(t.plain_text()),
            }
        }
        sections.push(lines.join("\n"));
    }
    Ok(sections.join("\n\u{000C}\n").trim().to_string())
}
