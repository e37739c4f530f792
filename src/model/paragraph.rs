//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

use super::BorderLine;

/// A paragraph of text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in reading order
    pub content: Vec<InlineContent>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self {
            content: Vec::new(),
            style: ParagraphStyle::default(),
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph holding a single styled run.
    pub fn with_run(run: TextRun) -> Self {
        let mut p = Self::new();
        p.add_run(run);
        p
    }

    /// Create a paragraph that only keeps vertical space (a single blank).
    pub fn spacer() -> Self {
        Self::with_text(" ")
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.alignment = alignment;
        self
    }

    /// Set the first-line indent (twips) and return self.
    pub fn first_line_indent(mut self, twips: u32) -> Self {
        self.style.first_line_indent = Some(twips);
        self
    }

    /// Set the left indent (twips) and return self.
    pub fn indent_left(mut self, twips: u32) -> Self {
        self.style.indent_left = Some(twips);
        self
    }

    /// Set spacing before/after (twips) and return self.
    pub fn spacing(mut self, before: Option<u32>, after: Option<u32>) -> Self {
        self.style.space_before = before;
        self.style.space_after = after;
        self
    }

    /// Set a bottom border rule and return self.
    pub fn border_bottom(mut self, border: BorderLine) -> Self {
        self.style.border_bottom = Some(border);
        self
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(InlineContent::Text(run));
    }

    /// Add a line break.
    pub fn add_line_break(&mut self) {
        self.content.push(InlineContent::LineBreak);
    }

    /// Add an inline image referencing a document resource.
    pub fn add_image(&mut self, resource_id: impl Into<String>, width: u32, height: u32) {
        self.content.push(InlineContent::Image {
            resource_id: resource_id.into(),
            width,
            height,
        });
    }

    /// Iterate over the text runs of the paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Iterate over the resource IDs of inline images.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::Image { resource_id, .. } => Some(resource_id.as_str()),
            _ => None,
        })
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.clone(),
                InlineContent::LineBreak => "\n".to_string(),
                InlineContent::Image { .. } => String::new(),
            })
            .collect()
    }

    /// Check if the paragraph has no visible text and no image.
    pub fn is_empty(&self) -> bool {
        self.images().next().is_none() && self.plain_text().trim().is_empty()
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A line break
    LineBreak,

    /// An inline image with a fixed display size
    Image {
        /// Resource ID (logical photo name)
        resource_id: String,
        /// Display width in device-independent pixels
        width: u32,
        /// Display height in device-independent pixels
        height: u32,
    },
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text).with_bold()
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text).with_italic()
    }

    /// Make the run bold.
    pub fn with_bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    /// Make the run italic.
    pub fn with_italic(mut self) -> Self {
        self.style.italic = true;
        self
    }

    /// Underline the run with a single line.
    pub fn with_underline(mut self) -> Self {
        self.style.underline = true;
        self
    }

    /// Raise the run to superscript.
    pub fn with_superscript(mut self) -> Self {
        self.style.superscript = true;
        self
    }

    /// Override the font size in points.
    pub fn with_size(mut self, points: f32) -> Self {
        self.style.font_size = Some(points);
        self
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Single underline
    pub underline: bool,

    /// Superscript
    pub superscript: bool,

    /// Font size in points; `None` uses the document default
    pub font_size: Option<f32>,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.superscript
    }
}

/// Paragraph styling properties. Lengths are in twips (1/20 pt).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Alignment,

    /// Left indent
    pub indent_left: Option<u32>,

    /// First line indent
    pub first_line_indent: Option<u32>,

    /// Space before paragraph
    pub space_before: Option<u32>,

    /// Space after paragraph
    pub space_after: Option<u32>,

    /// Rule under the paragraph
    pub border_bottom: Option<BorderLine>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::bold("Кому: "));
        p.add_text("ООО «Подрядчик»");

        assert_eq!(p.plain_text(), "Кому: ООО «Подрядчик»");
    }

    #[test]
    fn test_line_break_in_plain_text() {
        let mut p = Paragraph::with_text("№");
        p.add_line_break();
        p.add_text("п/п");
        assert_eq!(p.plain_text(), "№\nп/п");
    }

    #[test]
    fn test_spacer_and_image_emptiness() {
        assert!(Paragraph::spacer().is_empty());

        let mut p = Paragraph::new();
        p.add_image("photo.jpg", 500, 300);
        assert!(!p.is_empty());
        assert_eq!(p.images().collect::<Vec<_>>(), vec!["photo.jpg"]);
    }

    #[test]
    fn test_text_style() {
        assert!(!TextStyle::default().has_styling());

        let run = TextRun::italic("(подпись)").with_size(9.0);
        assert!(run.style.has_styling());
        assert_eq!(run.style.font_size, Some(9.0));
    }
}
