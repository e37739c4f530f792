//! Document-level types.

use super::{ImageResource, Section};
use serde::{Deserialize, Serialize};

/// A composed notice document: the intermediate representation handed to a
/// serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Default run properties
    pub defaults: RunDefaults,

    /// Sections in the document
    pub sections: Vec<Section>,

    /// Embedded images, in appendix order
    pub resources: Vec<ImageResource>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            defaults: RunDefaults::default(),
            sections: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Add a resource to the document.
    pub fn add_resource(&mut self, resource: ImageResource) {
        self.resources.push(resource);
    }

    /// Get a resource by its logical name.
    pub fn get_resource(&self, name: &str) -> Option<&ImageResource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Check if the document has any sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Notice number the document was composed for
    pub notice_number: Option<String>,

    /// Organization issuing the notice
    pub organization: Option<String>,

    /// Producing application
    pub producer: Option<String>,
}

/// Default font settings applied to every run without an override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDefaults {
    /// Font family
    pub font: String,

    /// Font size in points
    pub font_size: f32,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            font_size: 12.0,
        }
    }
}
