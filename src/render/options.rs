//! Rendering options and configuration.

/// Options for preview rendering of a composed document.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Prefix for image paths in output (e.g., "./images/")
    pub image_path_prefix: String,

    /// How to render bordered tables
    pub table_fallback: TableFallback,

    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Preserve line breaks inside paragraphs
    pub preserve_line_breaks: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Collect document statistics during rendering
    pub collect_stats: bool,
}

impl MarkdownOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Set the table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.table_fallback = fallback;
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable line break preservation.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Enable or disable escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            image_path_prefix: String::new(),
            table_fallback: TableFallback::Auto,
            include_frontmatter: false,
            preserve_line_breaks: true,
            escape_special_chars: true,
            collect_stats: false,
        }
    }
}

/// How to render bordered tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFallback {
    /// HTML for tables whose cells hold several paragraphs, Markdown otherwise
    #[default]
    Auto,
    /// Always Markdown pipe tables (cell paragraphs are joined)
    Markdown,
    /// Always HTML tables
    Html,
}
