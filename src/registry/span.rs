//! Row-span metadata for grouped registry columns.

use serde::{Deserialize, Serialize};

use super::{Column, RegistryRow};

/// How one cell of a grouped column is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SpanCell {
    /// The cell renders its value over `span` rows
    Render {
        /// Number of rows covered, at least 1
        span: usize,
    },
    /// Covered by a cell above; not rendered
    Suppressed,
}

impl SpanCell {
    /// Check if the cell is rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(self, SpanCell::Render { .. })
    }

    /// Row span of a rendered cell, 0 for suppressed ones.
    pub fn span(&self) -> usize {
        match self {
            SpanCell::Render { span } => *span,
            SpanCell::Suppressed => 0,
        }
    }
}

/// Spans of consecutive equal keys.
///
/// The first element of each run is `Render` with the run length, the rest
/// are `Suppressed`.
pub fn runs_by<K: PartialEq>(keys: &[K]) -> Vec<SpanCell> {
    let mut cells = vec![SpanCell::Suppressed; keys.len()];
    let mut start = 0;
    while start < keys.len() {
        let mut end = start + 1;
        while end < keys.len() && keys[end] == keys[start] {
            end += 1;
        }
        cells[start] = SpanCell::Render { span: end - start };
        start = end;
    }
    cells
}

/// Span metadata for a list of registry rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMap {
    grouped: Vec<Column>,
    runs: Vec<SpanCell>,
}

impl SpanMap {
    /// Display of the cell at (`row`, `column`).
    ///
    /// Columns that are not grouped always render with a span of 1; rows out
    /// of range are suppressed.
    pub fn get(&self, row: usize, column: Column) -> SpanCell {
        match self.runs.get(row) {
            None => SpanCell::Suppressed,
            Some(cell) if self.grouped.contains(&column) => *cell,
            Some(_) => SpanCell::Render { span: 1 },
        }
    }

    /// Check if a column is grouped.
    pub fn is_grouped(&self, column: Column) -> bool {
        self.grouped.contains(&column)
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Check if no rows are covered.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of runs (distinct consecutive notices).
    pub fn run_count(&self) -> usize {
        self.runs.iter().filter(|c| c.is_rendered()).count()
    }
}

/// Compute row spans for the grouped columns.
///
/// A run is a maximal sequence of adjacent rows from the same source notice
/// (by position in the flattened input, not by number).
pub fn compute_span(rows: &[RegistryRow], grouped: &[Column]) -> SpanMap {
    let keys: Vec<usize> = rows.iter().map(|r| r.source_index).collect();
    SpanMap {
        grouped: grouped.to_vec(),
        runs: runs_by(&keys),
    }
}
