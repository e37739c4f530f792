//! Image format detection and classification.

use crate::error::{Error, Result};
use crate::model::ImageFormat;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";
const BMP_MAGIC: &[u8] = b"BM";

/// Detect an embeddable image format from leading magic bytes.
///
/// # Returns
/// * `Some(format)` if the data starts with a JPEG, PNG, GIF or BMP header
/// * `None` otherwise
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(JPEG_MAGIC) {
        return Some(ImageFormat::Jpg);
    }
    if data.starts_with(PNG_MAGIC) {
        return Some(ImageFormat::Png);
    }
    if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        return Some(ImageFormat::Gif);
    }
    // "BM" alone is too weak; require room for the 14-byte file header
    if data.len() >= 14 && data.starts_with(BMP_MAGIC) {
        return Some(ImageFormat::Bmp);
    }
    None
}

/// Extension of a file name, without the dot.
pub fn name_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// What the caller declared about a photo before its bytes were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declared<'a> {
    /// MIME type of a freshly selected file (e.g. `image/jpeg`)
    MimeType(&'a str),
    /// File extension of a stored photo name
    Extension(&'a str),
    /// Nothing known
    Unknown,
}

/// Classify a photo into one of the embeddable formats.
///
/// The declared type wins when it names a supported format. Otherwise the
/// bytes are sniffed. A photo with nothing declared and unrecognizable bytes
/// falls back to `fallback`; a photo declared as something unsupported whose
/// bytes are also unrecognizable is rejected.
pub fn classify(
    name: &str,
    declared: Declared<'_>,
    data: &[u8],
    fallback: ImageFormat,
) -> Result<ImageFormat> {
    let (parsed, label) = match declared {
        Declared::MimeType(m) if !m.trim().is_empty() => (ImageFormat::from_mime_type(m), m),
        Declared::Extension(e) if !e.trim().is_empty() => (ImageFormat::from_extension(e), e),
        _ => (None, ""),
    };

    if let Some(format) = parsed {
        return Ok(format);
    }

    if let Some(format) = sniff_format(data) {
        if !label.is_empty() {
            log::debug!(
                "Photo '{}' declared as '{}', detected {} from content",
                name,
                label,
                format
            );
        }
        return Ok(format);
    }

    if label.is_empty() {
        Ok(fallback)
    } else {
        Err(Error::UnsupportedImage {
            name: name.to_string(),
            detail: format!("declared '{}', content not recognized", label),
        })
    }
}

/// Check if bytes look like an embeddable image.
pub fn is_supported_image(data: &[u8]) -> bool {
    sniff_format(data).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

    #[test]
    fn test_sniff_formats() {
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpg));
        assert_eq!(sniff_format(PNG), Some(ImageFormat::Png));
        assert_eq!(sniff_format(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(sniff_format(b"BM\0\0\0\0\0\0\0\0\0\0\0\0"), Some(ImageFormat::Bmp));
        assert_eq!(sniff_format(b"BM"), None);
        assert_eq!(sniff_format(b"RIFF\0\0\0\0WEBP"), None);
        assert_eq!(sniff_format(&[]), None);
    }

    #[test]
    fn test_name_extension() {
        assert_eq!(name_extension("photo.JPEG"), Some("JPEG"));
        assert_eq!(name_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(name_extension("noext"), None);
        assert_eq!(name_extension(".hidden"), None);
        assert_eq!(name_extension("trailing."), None);
    }

    #[test]
    fn test_classify_declared_wins() {
        let f = classify("a", Declared::MimeType("image/jpeg"), PNG, ImageFormat::Png).unwrap();
        assert_eq!(f, ImageFormat::Jpg);

        let f = classify("a.bmp", Declared::Extension("bmp"), &[], ImageFormat::Png).unwrap();
        assert_eq!(f, ImageFormat::Bmp);
    }

    #[test]
    fn test_classify_sniffs_unsupported_declaration() {
        let f = classify("a.heic", Declared::Extension("heic"), PNG, ImageFormat::Png).unwrap();
        assert_eq!(f, ImageFormat::Png);
    }

    #[test]
    fn test_classify_rejects_unknown_content() {
        let result = classify("a.webp", Declared::Extension("webp"), b"RIFF", ImageFormat::Png);
        assert!(matches!(result, Err(Error::UnsupportedImage { .. })));
    }

    #[test]
    fn test_classify_fallback() {
        let f = classify("blob", Declared::Unknown, b"???", ImageFormat::Png).unwrap();
        assert_eq!(f, ImageFormat::Png);

        let f = classify("blob", Declared::MimeType(""), b"???", ImageFormat::Gif).unwrap();
        assert_eq!(f, ImageFormat::Gif);
    }
}
