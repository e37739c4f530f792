//! Resolved image resources embedded in a notice document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A photo reduced to raw bytes plus a normalized format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResource {
    /// Logical name (file name of the photo)
    pub name: String,

    /// Where the bytes came from
    pub origin: ImageOrigin,

    /// Normalized image format
    pub format: ImageFormat,

    /// Raw image bytes
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Display size, independent of the source resolution
    pub display: DisplaySize,
}

impl ImageResource {
    /// Create a new resource with the default display size.
    pub fn new(
        name: impl Into<String>,
        origin: ImageOrigin,
        format: ImageFormat,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            format,
            data,
            display: DisplaySize::default(),
        }
    }

    /// Set the display size and return self.
    pub fn with_display(mut self, display: DisplaySize) -> Self {
        self.display = display;
        self
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Normalized extension (`jpg`, `png`, `gif`, `bmp`).
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// MIME type of the image.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Get a file name for writing the bytes to disk.
    ///
    /// Always a plain file name: path separators become `_`, and an empty or
    /// dot-only name becomes `image`. Keeps the logical name when it already
    /// carries the normalized extension, otherwise appends it.
    pub fn suggested_filename(&self) -> String {
        let base = self.name.trim().replace(['/', '\\'], "_");
        let base = if base.is_empty() || base == "." || base == ".." {
            "image".to_string()
        } else {
            base
        };
        let has_ext = base
            .rsplit_once('.')
            .map(|(_, ext)| ImageFormat::from_extension(ext) == Some(self.format))
            .unwrap_or(false);
        if has_ext {
            base
        } else {
            format!("{}.{}", base, self.extension())
        }
    }
}

/// Origin of an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    /// Newly selected, not yet persisted
    Upload,
    /// Previously uploaded and stored
    Persisted,
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOrigin::Upload => write!(f, "upload"),
            ImageOrigin::Persisted => write!(f, "persisted"),
        }
    }
}

/// Embeddable image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG (`jpeg` is normalized to `jpg`)
    Jpg,
    /// PNG
    Png,
    /// GIF
    Gif,
    /// BMP
    Bmp,
}

impl ImageFormat {
    /// Parse a file extension or MIME subtype. Case-insensitive, `jpeg` maps to `jpg`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "pjpeg" => Some(ImageFormat::Jpg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "bmp" | "x-bmp" | "x-ms-bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Parse a MIME type such as `image/jpeg`.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let (kind, subtype) = mime.split_once('/')?;
        if !kind.trim().eq_ignore_ascii_case("image") {
            return None;
        }
        let subtype = subtype.split(';').next().unwrap_or_default();
        Self::from_extension(subtype)
    }

    /// Normalized extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }

    /// MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Logical display size in device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl DisplaySize {
    /// Create a display size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for DisplaySize {
    fn default() -> Self {
        Self::new(500, 300)
    }
}
