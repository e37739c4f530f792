//! Error types for noticedoc library.

use crate::model::ImageOrigin;
use crate::notice::ValidationReport;
use std::io;
use thiserror::Error;

/// Result type alias for noticedoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while editing, exporting or submitting a notice.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing. Only blocking issues end up here.
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    /// A photo could not be read or fetched. Aborts the whole export.
    #[error("Failed to resolve {origin} photo '{name}': {reason}")]
    ImageResolution {
        /// Logical photo name
        name: String,
        /// Where the photo was supposed to come from
        origin: ImageOrigin,
        /// Underlying failure
        reason: String,
    },

    /// A photo is not one of the embeddable formats.
    #[error("Unsupported image format for '{name}': {detail}")]
    UnsupportedImage {
        /// Logical photo name
        name: String,
        /// Declared type or sniffing result
        detail: String,
    },

    /// The container codec failed on a structurally valid document.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The notice store rejected or failed the save.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A field value could not be stored.
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidField {
        /// Field name as addressed by the caller
        field: String,
        /// Rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No serializer is registered for the requested format.
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// HTTP transport error.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an invalid field error.
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidField {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ImageResolution {
            name: "a.jpg".to_string(),
            origin: ImageOrigin::Persisted,
            reason: "404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to resolve persisted photo 'a.jpg': 404"
        );

        let err = Error::invalid_field("noticeDate", "32.13.2024", "not a date");
        assert_eq!(
            err.to_string(),
            "Invalid value '32.13.2024' for field 'noticeDate': not a date"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_validation());
    }
}
