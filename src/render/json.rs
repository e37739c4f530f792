//! JSON rendering of the document IR.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
///
/// Image bytes are not embedded; each resource carries its `byteLength`
/// instead.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let mut value = serde_json::to_value(doc)
        .map_err(|e| Error::Serialization(format!("JSON serialization error: {}", e)))?;

    if let Some(Value::Array(resources)) = value.get_mut("resources") {
        for (entry, resource) in resources.iter_mut().zip(&doc.resources) {
            if let Value::Object(map) = entry {
                map.insert("byteLength".to_string(), Value::from(resource.size()));
            }
        }
    }

    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&value),
        JsonFormat::Compact => serde_json::to_string(&value),
    };
    result.map_err(|e| Error::Serialization(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFormat, ImageOrigin, ImageResource, Paragraph, Section};

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Уведомление № 1".to_string());
        let mut section = Section::default();
        section.add_paragraph(Paragraph::with_text("Подписи:"));
        doc.add_section(section);

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_resources_without_bytes() {
        let mut doc = Document::new();
        doc.add_resource(ImageResource::new(
            "a.jpg",
            ImageOrigin::Upload,
            ImageFormat::Jpg,
            vec![0xFF, 0xD8, 0xFF, 0xE0],
        ));

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"byteLength\":4"));
        assert!(!json.contains("\"data\""));
    }
}
