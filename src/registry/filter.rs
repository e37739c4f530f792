//! Global "contains" filter over registry rows.

use unicode_normalization::UnicodeNormalization;

use super::{Column, RegistryRow};

/// Normalize text for matching: NFC, lowercase, surrounding whitespace
/// removed.
pub fn normalize(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

/// A prepared filter query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFilter {
    needle: String,
}

impl GlobalFilter {
    /// Prepare a query. An empty query matches everything.
    pub fn new(query: &str) -> Self {
        Self {
            needle: normalize(query),
        }
    }

    /// Check if the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Check if any of the given columns of a row contains the query.
    pub fn matches(&self, row: &RegistryRow, columns: &[Column]) -> bool {
        self.is_empty()
            || columns
                .iter()
                .any(|c| normalize(&c.value(row)).contains(&self.needle))
    }
}
