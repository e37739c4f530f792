//! Rendering module: previews of the document IR and of the registry.

mod json;
mod markdown;
mod options;
mod registry;
mod result;
mod text;
pub mod visitor;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{MarkdownOptions, TableFallback};
pub use registry::{registry_to_html, registry_to_text, RegistryRenderOptions};
pub use result::{DocumentStats, RenderResult};
pub use text::to_text;
pub use visitor::{
    collect_stats, CompositeVisitor, DefaultVisitor, DocumentVisitor, StatsVisitor, VisitorAction,
};
