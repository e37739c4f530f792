//! Built-in serializers: JSON IR, plain text and Markdown previews.

use crate::error::Result;
use crate::model::Document;
use crate::render::{to_json, to_markdown, to_text};

use super::{DocumentSerializer, ExportOptions};

/// Serializes the document IR as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    _private: (),
}

impl JsonSerializer {
    /// Create a new JSON serializer.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentSerializer for JsonSerializer {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &str {
        "application/json"
    }

    fn serialize(&self, doc: &Document, options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(to_json(doc, options.json_format)?.into_bytes())
    }
}

/// Serializes a plain text preview.
#[derive(Debug, Clone, Default)]
pub struct TextSerializer {
    _private: (),
}

impl TextSerializer {
    /// Create a new text serializer.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentSerializer for TextSerializer {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn mime_type(&self) -> &str {
        "text/plain"
    }

    fn serialize(&self, doc: &Document, _options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(to_text(doc)?.into_bytes())
    }
}

/// Serializes a Markdown preview.
#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer {
    _private: (),
}

impl MarkdownSerializer {
    /// Create a new Markdown serializer.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentSerializer for MarkdownSerializer {
    fn supported_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn mime_type(&self) -> &str {
        "text/markdown"
    }

    fn serialize(&self, doc: &Document, options: &ExportOptions) -> Result<Vec<u8>> {
        Ok(to_markdown(doc, &options.markdown)?.into_bytes())
    }
}
