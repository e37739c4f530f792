//! Image asset resolution.
//!
//! Merges newly selected uploads and persisted photo names into one ordered
//! list of [`ImageResource`]s with their bytes fully read. Persisted photos
//! come first, then uploads in selection order; this is the same order as the
//! name list sent on submission, so a saved and re-opened notice produces
//! the same appendix.
//!
//! Resolution is sequential and fail-fast: the first photo that cannot be
//! read aborts the whole operation with [`Error::ImageResolution`].

mod fetch;

pub use fetch::{encode_path_segment, photo_url, DirectoryFetcher, MemoryFetcher, PhotoFetcher};

#[cfg(feature = "http")]
pub use fetch::HttpFetcher;

use crate::detect::{self, Declared};
use crate::error::{Error, Result};
use crate::model::{DisplaySize, ImageFormat, ImageOrigin, ImageResource};
use crate::notice::{update_photo_set, PhotoChange, PhotoSet, SelectedUpload};

/// Options for image resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Display size given to every resolved image
    pub display: DisplaySize,

    /// Format assumed for a source with no declared type and unknown content
    pub fallback: ImageFormat,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            display: DisplaySize::default(),
            fallback: ImageFormat::Png,
        }
    }
}

impl ResolveOptions {
    /// Create new resolve options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display size.
    pub fn with_display_size(mut self, width: u32, height: u32) -> Self {
        self.display = DisplaySize::new(width, height);
        self
    }

    /// Set the fallback format.
    pub fn with_fallback(mut self, format: ImageFormat) -> Self {
        self.fallback = format;
        self
    }
}

/// Resolves photos against a fetcher for persisted names.
pub struct ImageAssetResolver<'a> {
    fetcher: &'a dyn PhotoFetcher,
    options: ResolveOptions,
}

impl<'a> ImageAssetResolver<'a> {
    /// Create a resolver with default options.
    pub fn new(fetcher: &'a dyn PhotoFetcher) -> Self {
        Self {
            fetcher,
            options: ResolveOptions::default(),
        }
    }

    /// Set the options and return self.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve a photo set in canonical order.
    pub async fn resolve_set(&self, photos: &PhotoSet) -> Result<Vec<ImageResource>> {
        log::debug!(
            "Resolving {} persisted and {} selected photos from {}",
            photos.persisted.len(),
            photos.selected.len(),
            self.fetcher.describe()
        );

        let mut resolved = Vec::with_capacity(photos.len());
        for name in &photos.persisted {
            resolved.push(self.resolve_persisted(name).await?);
        }
        for upload in &photos.selected {
            resolved.push(self.resolve_upload(upload).await?);
        }
        Ok(resolved)
    }

    /// Resolve uploads and persisted names.
    ///
    /// Names are deduplicated with the same rules as the photo queue: an
    /// upload replaces a persisted photo of the same name, and the latest of
    /// several same-named uploads wins.
    pub async fn resolve(
        &self,
        uploads: &[SelectedUpload],
        persisted: &[String],
    ) -> Result<Vec<ImageResource>> {
        let photos = update_photo_set(
            &PhotoSet::from_persisted(persisted.iter().cloned()),
            &[PhotoChange::Select(uploads.to_vec())],
        );
        self.resolve_set(&photos).await
    }

    async fn resolve_persisted(&self, name: &str) -> Result<ImageResource> {
        let data = self.fetcher.fetch(name).await.map_err(|e| match e {
            Error::ImageResolution { .. } => e,
            other => Error::ImageResolution {
                name: name.to_string(),
                origin: ImageOrigin::Persisted,
                reason: other.to_string(),
            },
        })?;

        let declared = detect::name_extension(name)
            .map(Declared::Extension)
            .unwrap_or(Declared::Unknown);
        self.finish(name, ImageOrigin::Persisted, declared, data)
    }

    async fn resolve_upload(&self, upload: &SelectedUpload) -> Result<ImageResource> {
        let data = upload
            .source
            .read()
            .await
            .map_err(|e| Error::ImageResolution {
                name: upload.name.clone(),
                origin: ImageOrigin::Upload,
                reason: e.to_string(),
            })?;

        let declared = if upload.mime_type.trim().is_empty() {
            detect::name_extension(&upload.name)
                .map(Declared::Extension)
                .unwrap_or(Declared::Unknown)
        } else {
            Declared::MimeType(&upload.mime_type)
        };
        self.finish(&upload.name, ImageOrigin::Upload, declared, data)
    }

    fn finish(
        &self,
        name: &str,
        origin: ImageOrigin,
        declared: Declared<'_>,
        data: Vec<u8>,
    ) -> Result<ImageResource> {
        let format = detect::classify(name, declared, &data, self.options.fallback)?;
        log::debug!("Resolved {} photo '{}' as {} ({} bytes)", origin, name, format, data.len());
        Ok(ImageResource::new(name, origin, format, data).with_display(self.options.display))
    }
}

/// Resolve uploads and persisted photo names with default options.
///
/// # Example
///
/// ```no_run
/// use noticedoc::notice::SelectedUpload;
/// use noticedoc::resolve::{resolve, DirectoryFetcher};
///
/// # async fn run() -> noticedoc::Result<()> {
/// let fetcher = DirectoryFetcher::new("uploads");
/// let uploads = vec![SelectedUpload::from_path("new.jpg")];
/// let images = resolve(&uploads, &["old.png".to_string()], &fetcher).await?;
/// assert_eq!(images[0].name, "old.png");
/// # Ok(())
/// # }
/// ```
pub async fn resolve(
    uploads: &[SelectedUpload],
    persisted: &[String],
    fetcher: &dyn PhotoFetcher,
) -> Result<Vec<ImageResource>> {
    ImageAssetResolver::new(fetcher)
        .resolve(uploads, persisted)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];
    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_order_and_normalization() {
        let fetcher = MemoryFetcher::new().with_photo("old.jpeg", JPEG.to_vec());
        let uploads = vec![
            SelectedUpload::from_bytes("a.jpeg", "image/jpeg", JPEG.to_vec()),
            SelectedUpload::from_bytes("b", "", PNG.to_vec()),
        ];

        let images = resolve(&uploads, &["old.jpeg".to_string()], &fetcher)
            .await
            .unwrap();
        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["old.jpeg", "a.jpeg", "b"]);
        assert_eq!(images[0].origin, ImageOrigin::Persisted);
        assert_eq!(images[0].extension(), "jpg");
        assert_eq!(images[1].extension(), "jpg");
        assert_eq!(images[2].extension(), "png");
        assert!(images.iter().all(|i| i.display == DisplaySize::new(500, 300)));
    }

    #[tokio::test]
    async fn test_missing_persisted_photo_fails_fast() {
        let fetcher = MemoryFetcher::new();
        let uploads = vec![SelectedUpload::from_bytes("a.jpg", "image/jpeg", JPEG.to_vec())];
        let err = resolve(&uploads, &["gone.jpg".to_string()], &fetcher)
            .await
            .unwrap_err();
        match err {
            Error::ImageResolution { name, origin, .. } => {
                assert_eq!(name, "gone.jpg");
                assert_eq!(origin, ImageOrigin::Persisted);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_upload_replaces_persisted_name() {
        let fetcher = MemoryFetcher::new();
        let uploads = vec![SelectedUpload::from_bytes("a.png", "image/png", PNG.to_vec())];
        let images = resolve(&uploads, &["a.png".to_string()], &fetcher)
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].origin, ImageOrigin::Upload);
    }

    #[tokio::test]
    async fn test_custom_options() {
        let fetcher = MemoryFetcher::new().with_photo("blob", b"????".to_vec());
        let resolver = ImageAssetResolver::new(&fetcher).with_options(
            ResolveOptions::new()
                .with_display_size(250, 150)
                .with_fallback(ImageFormat::Gif),
        );
        let images = resolver.resolve(&[], &["blob".to_string()]).await.unwrap();
        assert_eq!(images[0].format, ImageFormat::Gif);
        assert_eq!(images[0].display, DisplaySize::new(250, 150));
    }

    #[tokio::test]
    async fn test_unsupported_upload_rejected() {
        let fetcher = MemoryFetcher::new();
        let uploads = vec![SelectedUpload::from_bytes("a.webp", "image/webp", b"RIFF".to_vec())];
        let result = resolve(&uploads, &[], &fetcher).await;
        assert!(matches!(result, Err(Error::UnsupportedImage { .. })));
    }
}
