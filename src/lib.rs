//! # noticedoc
//!
//! Construction-site violation notices: the notice record and its
//! validation, photo resolution, composition of the printable document and
//! the flattened registry of all notices.
//!
//! ## Quick Start
//!
//! ```no_run
//! use noticedoc::{read_notice_file, render, Composer, PhotoSet};
//! use noticedoc::resolve::{DirectoryFetcher, ImageAssetResolver};
//!
//! # async fn run() -> noticedoc::Result<()> {
//! let notice = read_notice_file("notice.json")?;
//! noticedoc::validate(&notice).into_result()?;
//!
//! let fetcher = DirectoryFetcher::new("uploads");
//! let photos = PhotoSet::from_persisted(notice.photos.clone());
//! let images = ImageAssetResolver::new(&fetcher).resolve_set(&photos).await?;
//!
//! let doc = Composer::new().compose(&notice, &images);
//! println!("{}", render::to_text(&doc)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Notice model**: fields, violations, remediation action, validation
//! - **Photo resolution**: persisted names and fresh uploads as embeddable images
//! - **Composition**: a two-section paged document IR with signature blocks
//! - **Registry**: one row per violation with merged notice-level cells
//! - **HTTP** (feature `http`): photo fetching and multipart notice submission

pub mod compose;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod notice;
pub mod registry;
pub mod render;
pub mod resolve;

// Re-export commonly used types
pub use compose::{compose, output_file_name, Composer};
pub use error::{Error, Result};
pub use export::{
    export_notice, DocumentSerializer, ExportArtifact, ExportOptions, Exporter,
    SerializerRegistry,
};
pub use model::{
    Alignment, Block, Document, ImageFormat, ImageOrigin, ImageResource, Metadata, Paragraph,
    Section, Table, TableCell, TableRow, TextRun,
};
pub use notice::{
    validate, Notice, NoticeDraft, NoticeStore, PhotoChange, PhotoSet, RemediationAction,
    SelectedUpload, ValidationReport, Violation,
};
pub use registry::{compute_span, flatten, Column, Registry, RegistryRow, SpanCell};
pub use render::{JsonFormat, MarkdownOptions};
pub use resolve::{ImageAssetResolver, PhotoFetcher, ResolveOptions};

use std::path::Path;

/// Library version, recorded as the document producer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read a single notice from a JSON file.
///
/// # Example
///
/// ```no_run
/// use noticedoc::read_notice_file;
///
/// let notice = read_notice_file("notice.json").unwrap();
/// println!("Violations: {}", notice.violation_count());
/// ```
pub fn read_notice_file<P: AsRef<Path>>(path: P) -> Result<Notice> {
    let json = std::fs::read_to_string(path)?;
    Notice::from_json(&json)
}

/// Read a notice list from a JSON file.
///
/// Accepts either an array of notices or a single notice object.
pub fn read_notices_file<P: AsRef<Path>>(path: P) -> Result<Vec<Notice>> {
    let json = std::fs::read_to_string(path)?;
    if json.trim_start().starts_with('[') {
        Notice::list_from_json(&json)
    } else {
        Ok(vec![Notice::from_json(&json)?])
    }
}

/// Load notices from a JSON file into a registry.
///
/// # Example
///
/// ```no_run
/// use noticedoc::load_registry;
///
/// let mut registry = load_registry("notices.json").unwrap();
/// registry.set_filter("фасад");
/// println!("Rows: {}", registry.row_count());
/// ```
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<Registry> {
    Ok(Registry::load(read_notices_file(path)?))
}
