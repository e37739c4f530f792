//! Registry table rendering with merged notice-level cells.

use crate::registry::{Column, Registry, RegistryRow, SpanCell};
use crate::resolve::photo_url;

use super::markdown::html_escape;

/// Options for registry rendering.
#[derive(Debug, Clone, Default)]
pub struct RegistryRenderOptions {
    /// Base URL of stored photos; when set, photo names become links
    pub uploads_url: Option<String>,
}

impl RegistryRenderOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the uploads base URL.
    pub fn with_uploads_url(mut self, url: impl Into<String>) -> Self {
        self.uploads_url = Some(url.into());
        self
    }
}

/// Render the visible registry rows as an HTML table.
///
/// Notice-level columns are emitted once per run with a `rowspan`; the
/// covered cells are omitted.
pub fn registry_to_html(registry: &Registry, options: &RegistryRenderOptions) -> String {
    let columns = registry.columns();
    let spans = registry.spans();
    let mut out = String::from("<table>\n<thead>\n<tr>");
    for column in columns {
        out.push_str(&format!("<th>{}</th>", html_escape(column.header())));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (i, row) in registry.rows().enumerate() {
        out.push_str("<tr>");
        for &column in columns {
            match spans.get(i, column) {
                SpanCell::Suppressed => {}
                SpanCell::Render { span } => {
                    let attrs = if span > 1 {
                        format!(" rowspan=\"{}\"", span)
                    } else {
                        String::new()
                    };
                    out.push_str(&format!(
                        "<td{}>{}</td>",
                        attrs,
                        html_cell(row, column, options)
                    ));
                }
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn html_cell(row: &RegistryRow, column: Column, options: &RegistryRenderOptions) -> String {
    match (column, &options.uploads_url) {
        (Column::Photos, Some(base)) => row
            .photos
            .iter()
            .map(|name| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    html_escape(&photo_url(base, name)),
                    html_escape(name)
                )
            })
            .collect::<Vec<_>>()
            .join("<br>"),
        _ => html_escape(&column.value(row)),
    }
}

/// Render the visible registry rows as tab-separated text.
///
/// Covered cells of notice-level columns are left blank.
pub fn registry_to_text(registry: &Registry) -> String {
    let columns = registry.columns();
    let spans = registry.spans();
    let mut lines = Vec::with_capacity(registry.row_count() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.header())
            .collect::<Vec<_>>()
            .join("\t"),
    );
    for (i, row) in registry.rows().enumerate() {
        let cells: Vec<String> = columns
            .iter()
            .map(|&c| {
                if spans.get(i, c).is_rendered() {
                    column_text(row, c)
                } else {
                    String::new()
                }
            })
            .collect();
        lines.push(cells.join("\t"));
    }
    lines.join("\n")
}

fn column_text(row: &RegistryRow, column: Column) -> String {
    column.value(row).replace(['\t', '\n'], " ")
}
