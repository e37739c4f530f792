//! Export pipeline and the serializer boundary.
//!
//! A [`DocumentSerializer`] turns the composed IR into the bytes of a
//! downloadable file. Serializers are registered by extension in a
//! [`SerializerRegistry`]; a container codec (e.g. DOCX) plugs in the same
//! way as the built-in JSON, text and Markdown serializers.
//!
//! # Example
//!
//! ```no_run
//! use noticedoc::export::{Exporter, ExportOptions, SerializerRegistry};
//! use noticedoc::notice::{Notice, PhotoSet};
//! use noticedoc::resolve::DirectoryFetcher;
//!
//! # async fn run(notice: Notice) -> noticedoc::Result<()> {
//! let exporter = Exporter::new(SerializerRegistry::with_defaults())
//!     .with_options(ExportOptions::new().with_format("md"));
//! let photos = PhotoSet::from_persisted(notice.photos.clone());
//! let artifact = exporter
//!     .export(&notice, &photos, &DirectoryFetcher::new("uploads"))
//!     .await?;
//! artifact.write_to("out")?;
//! # Ok(())
//! # }
//! ```

mod builtin;

pub use builtin::{JsonSerializer, MarkdownSerializer, TextSerializer};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compose::{output_file_name, Composer};
use crate::error::{Error, Result};
use crate::model::{Document, ImageResource};
use crate::notice::{validate, Notice, PhotoSet};
use crate::render::{JsonFormat, MarkdownOptions};
use crate::resolve::{ImageAssetResolver, PhotoFetcher, ResolveOptions};

/// Options for exporting a notice.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output extension, selects the serializer
    pub format: String,

    /// JSON layout for the JSON serializer
    pub json_format: JsonFormat,

    /// Options for the Markdown serializer
    pub markdown: MarkdownOptions,

    /// Image resolution options
    pub resolve: ResolveOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            json_format: JsonFormat::Pretty,
            markdown: MarkdownOptions::default(),
            resolve: ResolveOptions::default(),
        }
    }
}

impl ExportOptions {
    /// Create new export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output extension.
    pub fn with_format(mut self, ext: impl Into<String>) -> Self {
        self.format = ext.into().trim_start_matches('.').to_lowercase();
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set Markdown options.
    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown = options;
        self
    }

    /// Set image resolution options.
    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.resolve = options;
        self
    }
}

/// A produced file: name, type and content.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// File name (`Уведомление_<number>.<ext>`)
    pub file_name: String,

    /// MIME type of the content
    pub mime_type: String,

    /// File content
    pub bytes: Vec<u8>,

    /// Images embedded in the document, in appendix order
    pub images: Vec<ImageResource>,
}

impl ExportArtifact {
    /// Get content length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the document and its images into `dir`.
    ///
    /// Images go next to the document under their suggested file names,
    /// which is where the Markdown preview links to. The directory is
    /// created if missing. Returns the path of the document file.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        for image in &self.images {
            let path = dir.join(image.suggested_filename());
            std::fs::write(&path, &image.data)?;
            log::debug!("Wrote photo {} ({} bytes)", path.display(), image.size());
        }

        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Trait for document serializers.
///
/// Implement this trait to add an output format.
pub trait DocumentSerializer: Send + Sync {
    /// Extensions this serializer produces, lowercase without the dot.
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this serializer.
    fn name(&self) -> &str;

    /// MIME type of the output.
    fn mime_type(&self) -> &str;

    /// Encode a document.
    fn serialize(&self, doc: &Document, options: &ExportOptions) -> Result<Vec<u8>>;

    /// Check if this serializer supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document serializers.
pub struct SerializerRegistry {
    serializers: HashMap<String, Arc<dyn DocumentSerializer>>,
    by_name: HashMap<String, Arc<dyn DocumentSerializer>>,
}

impl SerializerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            serializers: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in serializers (JSON, text, Markdown).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonSerializer::new()));
        registry.register(Arc::new(TextSerializer::new()));
        registry.register(Arc::new(MarkdownSerializer::new()));
        registry
    }

    /// Register a serializer for all its extensions. A later registration
    /// for the same extension replaces the earlier one.
    pub fn register(&mut self, serializer: Arc<dyn DocumentSerializer>) {
        for ext in serializer.supported_extensions() {
            self.serializers
                .insert(ext.to_lowercase(), serializer.clone());
        }
        self.by_name
            .insert(serializer.name().to_lowercase(), serializer);
    }

    /// Get a serializer by extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentSerializer>> {
        self.serializers
            .get(&ext.trim_start_matches('.').to_lowercase())
            .cloned()
    }

    /// Get a serializer by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentSerializer>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.get_by_extension(ext).is_some()
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.serializers.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Serialize a document with the serializer for `ext`.
    ///
    /// Failures of the serializer surface as [`Error::Serialization`].
    pub fn serialize(
        &self,
        doc: &Document,
        ext: &str,
        options: &ExportOptions,
    ) -> Result<(Arc<dyn DocumentSerializer>, Vec<u8>)> {
        let serializer = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnknownFormat(ext.to_string()))?;
        let bytes = serializer
            .serialize(doc, options)
            .map_err(|e| match e {
                Error::Serialization(_) => e,
                other => Error::Serialization(format!("{}: {}", serializer.name(), other)),
            })?;
        Ok((serializer, bytes))
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Runs the export pipeline: validate, resolve photos, compose, serialize.
///
/// Blocking validation issues stop the export before any I/O. Resolution
/// and serialization failures abort it with no partial output.
pub struct Exporter {
    registry: SerializerRegistry,
    composer: Composer,
    options: ExportOptions,
}

impl Exporter {
    /// Create an exporter with default options.
    pub fn new(registry: SerializerRegistry) -> Self {
        Self {
            registry,
            composer: Composer::new(),
            options: ExportOptions::default(),
        }
    }

    /// Set the options and return self.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the composer and return self.
    pub fn with_composer(mut self, composer: Composer) -> Self {
        self.composer = composer;
        self
    }

    /// Serializer registry in use.
    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    /// Export a notice with its photos.
    pub async fn export(
        &self,
        notice: &Notice,
        photos: &PhotoSet,
        fetcher: &dyn PhotoFetcher,
    ) -> Result<ExportArtifact> {
        let ext = self.options.format.as_str();
        if !self.registry.supports(ext) {
            return Err(Error::UnknownFormat(ext.to_string()));
        }

        let report = validate(notice).into_result()?;
        for issue in report.warnings() {
            log::warn!("Exporting with advisory: {}", issue);
        }

        let images = ImageAssetResolver::new(fetcher)
            .with_options(self.options.resolve.clone())
            .resolve_set(photos)
            .await?;

        let doc = self.composer.compose(notice, &images);
        let (serializer, bytes) = self.registry.serialize(&doc, ext, &self.options)?;

        let artifact = ExportArtifact {
            file_name: output_file_name(&notice.notice_num, ext),
            mime_type: serializer.mime_type().to_string(),
            bytes,
            images,
        };
        log::info!(
            "Exported '{}' ({} bytes, {} photos)",
            artifact.file_name,
            artifact.len(),
            artifact.images.len()
        );
        Ok(artifact)
    }
}

/// Export a notice with the built-in serializers.
pub async fn export_notice(
    notice: &Notice,
    photos: &PhotoSet,
    fetcher: &dyn PhotoFetcher,
    options: &ExportOptions,
) -> Result<ExportArtifact> {
    Exporter::new(SerializerRegistry::with_defaults())
        .with_options(options.clone())
        .export(notice, photos, fetcher)
        .await
}
