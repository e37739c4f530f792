//! Markdown preview rendering of the document IR.

use crate::error::Result;
use crate::model::{
    Block, Document, InlineContent, Metadata, Paragraph, Section, Table, TableRow, TextRun,
    TextStyle,
};

use super::visitor::{DefaultVisitor, DocumentVisitor, VisitorAction};
use super::{DocumentStats, MarkdownOptions, RenderResult, TableFallback};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &MarkdownOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &MarkdownOptions) -> Result<RenderResult> {
    let options = options.clone().with_stats(true);
    MarkdownRenderer::new(options).render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    visitor: Box<dyn DocumentVisitor>,
    stats: DocumentStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            visitor: Box::new(DefaultVisitor),
            stats: DocumentStats::new(),
        }
    }

    /// Use a visitor to customize rendering and return self.
    pub fn with_visitor<V: DocumentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitor = Box::new(visitor);
        self
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc)?;
        self.stats.count_text(&content);
        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&frontmatter(&doc.metadata));
        }

        for (index, section) in doc.sections.iter().enumerate() {
            if index > 0 {
                output.push_str("\n---\n\n");
            }
            self.visitor.on_section_start(index);
            self.render_section(&mut output, doc, section);
            self.visitor.on_section_end(index);
        }

        Ok(output.trim().to_string())
    }

    fn render_section(&mut self, output: &mut String, doc: &Document, section: &Section) {
        if self.options.collect_stats {
            self.stats.add_section();
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(p) => self.render_paragraph(output, doc, p),
                Block::Table(t) => self.render_table(output, t),
            }
        }
    }

    fn render_paragraph(&mut self, output: &mut String, doc: &Document, para: &Paragraph) {
        if para.is_empty() {
            return;
        }
        match self.visitor.visit_paragraph(para) {
            VisitorAction::Skip => return,
            VisitorAction::Replace(s) => {
                output.push_str(&s);
                return;
            }
            VisitorAction::Continue => {}
        }
        if self.options.collect_stats {
            self.stats.add_paragraph();
        }

        let mut line = String::new();
        self.render_inline_content(&mut line, doc, &para.content);
        if !line.trim().is_empty() {
            output.push_str(line.trim_end());
            output.push_str("\n\n");
        }
    }

    fn render_inline_content(&mut self, output: &mut String, doc: &Document, content: &[InlineContent]) {
        for item in content {
            match item {
                InlineContent::Text(run) => self.render_text_run(output, run),
                InlineContent::LineBreak => {
                    if self.options.preserve_line_breaks {
                        output.push_str("  \n");
                    } else {
                        output.push(' ');
                    }
                }
                InlineContent::Image {
                    resource_id,
                    width,
                    height,
                } => match self.visitor.visit_image(resource_id, *width, *height) {
                    VisitorAction::Skip => {}
                    VisitorAction::Replace(s) => output.push_str(&s),
                    VisitorAction::Continue => {
                        if self.options.collect_stats {
                            self.stats.add_image();
                        }
                        let file = doc
                            .get_resource(resource_id)
                            .map(|r| r.suggested_filename())
                            .unwrap_or_else(|| resource_id.clone());
                        output.push_str(&format!(
                            "![{}]({}{})",
                            resource_id, self.options.image_path_prefix, file
                        ));
                    }
                },
            }
        }
    }

    fn render_text_run(&self, output: &mut String, run: &TextRun) {
        if run.text.trim().is_empty() {
            output.push_str(&run.text);
            return;
        }
        let text = if self.options.escape_special_chars {
            escape_markdown(&run.text)
        } else {
            run.text.clone()
        };
        output.push_str(&apply_text_style(&text, &run.style));
    }

    fn render_table(&mut self, output: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }
        match self.visitor.visit_table(table) {
            VisitorAction::Skip => return,
            VisitorAction::Replace(s) => {
                output.push_str(&s);
                return;
            }
            VisitorAction::Continue => {}
        }
        if self.options.collect_stats {
            self.stats.add_table(table.row_count());
        }

        // Layout tables (addressee, signatures) read best as plain lines
        if !table.borders.any_visible() {
            self.render_layout_table(output, table);
            return;
        }

        let multi_paragraph = table
            .rows
            .iter()
            .flat_map(|r| &r.cells)
            .any(|c| c.content.len() > 1);
        let html = match self.options.table_fallback {
            TableFallback::Auto => multi_paragraph,
            TableFallback::Markdown => false,
            TableFallback::Html => true,
        };
        if html {
            self.render_table_html(output, table);
        } else {
            self.render_table_markdown(output, table);
        }
    }

    fn render_layout_table(&self, output: &mut String, table: &Table) {
        for row in &table.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| c.plain_text().trim().replace('\n', " "))
                .filter(|t| !t.is_empty())
                .collect();
            if !cells.is_empty() {
                output.push_str(&cells.join(" | "));
                output.push_str("\n\n");
            }
        }
    }

    fn render_table_markdown(&self, output: &mut String, table: &Table) {
        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for cell in &row.cells {
                let content = escape_cell(&cell.plain_text().replace('\n', " "));
                output.push_str(&format!(" {} |", content.trim()));
            }
            output.push('\n');

            if i == 0 {
                output.push('|');
                for _ in &row.cells {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }
        output.push('\n');
    }

    fn render_table_html(&self, output: &mut String, table: &Table) {
        output.push_str("<table>\n");

        if table.header_rows > 0 {
            output.push_str("<thead>\n");
            for row in table.header() {
                render_html_row(output, row, true);
            }
            output.push_str("</thead>\n");
        }

        output.push_str("<tbody>\n");
        for row in table.body() {
            render_html_row(output, row, false);
        }
        output.push_str("</tbody>\n");

        output.push_str("</table>\n\n");
    }
}

fn render_html_row(output: &mut String, row: &TableRow, is_header: bool) {
    let tag = if is_header { "th" } else { "td" };
    output.push_str("<tr>");
    for cell in &row.cells {
        let content: Vec<String> = cell
            .content
            .iter()
            .map(|p| html_escape(&p.plain_text()).replace('\n', "<br>"))
            .collect();
        output.push_str(&format!("<{}>{}</{}>", tag, content.join("<br>"), tag));
    }
    output.push_str("</tr>\n");
}

fn apply_text_style(text: &str, style: &TextStyle) -> String {
    let mut result = text.to_string();
    if style.italic {
        result = format!("*{}*", result);
    }
    if style.bold {
        result = format!("**{}**", result);
    }
    if style.superscript {
        result = format!("<sup>{}</sup>", result);
    }
    if style.underline {
        result = format!("<u>{}</u>", result);
    }
    result
}

fn frontmatter(metadata: &Metadata) -> String {
    let mut out = String::from("---\n");
    let fields = [
        ("title", &metadata.title),
        ("notice_number", &metadata.notice_number),
        ("organization", &metadata.organization),
        ("producer", &metadata.producer),
    ];
    for (key, value) in fields {
        if let Some(v) = value {
            out.push_str(&format!("{}: \"{}\"\n", key, v.replace('"', "\\\"")));
        }
    }
    out.push_str("---\n\n");
    out
}

/// Escape special Markdown characters.
/// Only characters that could be misread as Markdown syntax are escaped.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Escape text for HTML element content.
pub(crate) fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFormat, ImageOrigin, ImageResource, TableCell};
    use crate::render::visitor::SkipImagesVisitor;

    fn doc_with(section: Section) -> Document {
        let mut doc = Document::new();
        doc.add_section(section);
        doc
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("СП *70*"), "СП \\*70\\*");
        assert_eq!(escape_markdown("[1]"), "\\[1\\]");
        assert_eq!(escape_markdown("________"), "\\_\\_\\_\\_\\_\\_\\_\\_");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>&\"</b>"), "&lt;b&gt;&amp;&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_render_styled_paragraph() {
        let mut section = Section::default();
        let mut p = Paragraph::with_text("прошу ");
        p.add_run(TextRun::bold("необходимо: остановить"));
        section.add_paragraph(p);
        section.add_paragraph(Paragraph::spacer());

        let md = to_markdown(&doc_with(section), &MarkdownOptions::new()).unwrap();
        assert_eq!(md, "прошу **необходимо: остановить**");
    }

    #[test]
    fn test_multi_paragraph_table_uses_html() {
        let mut table = Table::new().with_header(1);
        table.add_row(TableRow::header(vec![TableCell::text("Перечень")]));
        table.add_row(TableRow::new(vec![TableCell::with_content(vec![
            Paragraph::with_text("Место нарушения:"),
            Paragraph::with_text("ось <3>"),
        ])]));
        let mut section = Section::default();
        section.add_table(table);

        let md = to_markdown(&doc_with(section), &MarkdownOptions::new()).unwrap();
        assert!(md.contains("<th>Перечень</th>"));
        assert!(md.contains("<td>Место нарушения:<br>ось &lt;3&gt;</td>"));
    }

    #[test]
    fn test_layout_table_as_lines() {
        let mut table = Table::borderless();
        table.add_row(TableRow::new(vec![
            TableCell::text("« 05 »  марта  2024 г."),
            TableCell::text("Кому: Иванову"),
        ]));
        let mut section = Section::default();
        section.add_table(table);

        let md = to_markdown(
            &doc_with(section),
            &MarkdownOptions::new().with_escaping(false),
        )
        .unwrap();
        assert_eq!(md, "« 05 »  марта  2024 г. | Кому: Иванову");
    }

    #[test]
    fn test_images_and_visitor() {
        let mut p = Paragraph::new();
        p.add_image("scan", 500, 300);
        let mut section = Section::default();
        section.add_paragraph(p);
        let mut doc = doc_with(section);
        doc.add_resource(ImageResource::new("scan", ImageOrigin::Upload, ImageFormat::Png, vec![]));

        let options = MarkdownOptions::new().with_image_prefix("photos/");
        let md = to_markdown(&doc, &options).unwrap();
        assert_eq!(md, "![scan](photos/scan.png)");

        let md = MarkdownRenderer::new(options)
            .with_visitor(SkipImagesVisitor)
            .render(&doc)
            .unwrap();
        assert!(md.is_empty());
    }

    #[test]
    fn test_frontmatter_and_stats() {
        let mut doc = doc_with(Section::default());
        doc.metadata.title = Some("Уведомление № 5".into());
        doc.add_section(Section::default());

        let result = to_markdown_with_stats(&doc, &MarkdownOptions::new().with_frontmatter(true))
            .unwrap();
        assert!(result.content.starts_with("---\ntitle: \"Уведомление № 5\""));
        assert_eq!(result.stats.section_count, 2);
    }
}
