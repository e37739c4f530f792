//! Photo set of a notice: persisted names plus newly selected files.

use std::path::PathBuf;

use crate::model::ImageOrigin;

/// Where the bytes of a newly selected file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// Already in memory
    Bytes(Vec<u8>),
    /// A local file, read when needed
    File(PathBuf),
}

impl UploadSource {
    /// Read the whole source into memory.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            UploadSource::Bytes(data) => Ok(data.clone()),
            UploadSource::File(path) => tokio::fs::read(path).await,
        }
    }
}

/// A file selected for upload but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUpload {
    /// Logical name (file name)
    pub name: String,
    /// Declared MIME type, may be empty
    pub mime_type: String,
    /// Bytes
    pub source: UploadSource,
}

impl SelectedUpload {
    /// Create an upload from in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            source: UploadSource::Bytes(data),
        }
    }

    /// Create an upload backed by a local file. The file name becomes the
    /// logical name and the MIME type is guessed from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = crate::detect::name_extension(&name)
            .and_then(crate::model::ImageFormat::from_extension)
            .map(|f| f.mime_type().to_string())
            .unwrap_or_default();
        Self {
            name,
            mime_type,
            source: UploadSource::File(path),
        }
    }
}

/// One entry of the combined photo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoEntry<'a> {
    /// Logical name
    pub name: &'a str,
    /// Persisted or newly selected
    pub origin: ImageOrigin,
}

/// The photos of one notice.
///
/// The combined order is persisted photos first, then new uploads in
/// selection order. Both the submitted name list and the document appendix
/// use this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSet {
    /// Names of photos already stored by the backend
    pub persisted: Vec<String>,
    /// Newly selected files
    pub selected: Vec<SelectedUpload>,
}

impl PhotoSet {
    /// Create an empty photo set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a photo set from persisted names only.
    pub fn from_persisted(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut set = Self::new();
        for name in names {
            let name = name.into();
            if !set.persisted.contains(&name) {
                set.persisted.push(name);
            }
        }
        set
    }

    /// Combined entries in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = PhotoEntry<'_>> {
        let persisted = self.persisted.iter().map(|n| PhotoEntry {
            name: n,
            origin: ImageOrigin::Persisted,
        });
        let selected = self.selected.iter().map(|u| PhotoEntry {
            name: &u.name,
            origin: ImageOrigin::Upload,
        });
        persisted.chain(selected)
    }

    /// Combined names in canonical order.
    pub fn names(&self) -> Vec<String> {
        self.entries().map(|e| e.name.to_string()).collect()
    }

    /// Total number of photos.
    pub fn len(&self) -> usize {
        self.persisted.len() + self.selected.len()
    }

    /// Check if there are no photos.
    pub fn is_empty(&self) -> bool {
        self.persisted.is_empty() && self.selected.is_empty()
    }

    /// Check if any uploads are pending.
    pub fn has_uploads(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Treat every upload as persisted (after a successful save).
    pub fn mark_persisted(&mut self) {
        let uploaded: Vec<String> = self.selected.drain(..).map(|u| u.name).collect();
        self.persisted.extend(uploaded);
    }
}

/// A change to the photo set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoChange {
    /// Files were selected
    Select(Vec<SelectedUpload>),
    /// One selected file was removed from the queue
    RemoveSelected(String),
    /// The whole selection queue was cleared
    ClearSelected,
    /// A persisted photo was removed
    RemovePersisted(String),
}

/// Apply changes to a photo set, returning the new set.
///
/// Uniqueness is by logical name: selecting a file whose name is already
/// selected replaces the earlier selection, and a selected file whose name
/// matches a persisted photo supersedes that persisted entry.
pub fn update_photo_set(current: &PhotoSet, changes: &[PhotoChange]) -> PhotoSet {
    let mut next = current.clone();
    for change in changes {
        match change {
            PhotoChange::Select(files) => {
                for file in files {
                    next.selected.retain(|u| u.name != file.name);
                    if next.persisted.iter().any(|p| p == &file.name) {
                        log::warn!(
                            "Selected file '{}' replaces the stored photo of the same name",
                            file.name
                        );
                        next.persisted.retain(|p| p != &file.name);
                    }
                    next.selected.push(file.clone());
                }
            }
            PhotoChange::RemoveSelected(name) => next.selected.retain(|u| &u.name != name),
            PhotoChange::ClearSelected => next.selected.clear(),
            PhotoChange::RemovePersisted(name) => next.persisted.retain(|p| p != name),
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> SelectedUpload {
        SelectedUpload::from_bytes(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    #[test]
    fn test_canonical_order_persisted_first() {
        let set = update_photo_set(
            &PhotoSet::from_persisted(["old1.jpg", "old2.jpg"]),
            &[PhotoChange::Select(vec![upload("new1.jpg"), upload("new2.jpg")])],
        );
        assert_eq!(
            set.names(),
            vec!["old1.jpg", "old2.jpg", "new1.jpg", "new2.jpg"]
        );
        let origins: Vec<_> = set.entries().map(|e| e.origin).collect();
        assert_eq!(origins[0], ImageOrigin::Persisted);
        assert_eq!(origins[3], ImageOrigin::Upload);
    }

    #[test]
    fn test_removals_take_effect_immediately() {
        let start = update_photo_set(
            &PhotoSet::from_persisted(["old.jpg"]),
            &[PhotoChange::Select(vec![upload("a.jpg"), upload("b.jpg")])],
        );
        let set = update_photo_set(
            &start,
            &[
                PhotoChange::RemoveSelected("a.jpg".into()),
                PhotoChange::RemovePersisted("old.jpg".into()),
            ],
        );
        assert_eq!(set.names(), vec!["b.jpg"]);

        let cleared = update_photo_set(&start, &[PhotoChange::ClearSelected]);
        assert_eq!(cleared.names(), vec!["old.jpg"]);
        // the input is untouched
        assert_eq!(start.len(), 3);
    }

    #[test]
    fn test_duplicate_names() {
        let set = update_photo_set(
            &PhotoSet::from_persisted(["a.jpg", "a.jpg", "b.jpg"]),
            &[
                PhotoChange::Select(vec![upload("c.jpg")]),
                PhotoChange::Select(vec![upload("c.jpg"), upload("b.jpg")]),
            ],
        );
        assert_eq!(set.names(), vec!["a.jpg", "c.jpg", "b.jpg"]);
        assert_eq!(set.selected.len(), 2);
    }

    #[test]
    fn test_mark_persisted() {
        let mut set = update_photo_set(
            &PhotoSet::from_persisted(["a.jpg"]),
            &[PhotoChange::Select(vec![upload("b.png")])],
        );
        set.mark_persisted();
        assert!(!set.has_uploads());
        assert_eq!(set.persisted, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn test_from_path_guesses_mime() {
        let u = SelectedUpload::from_path("/tmp/photo.JPEG");
        assert_eq!(u.name, "photo.JPEG");
        assert_eq!(u.mime_type, "image/jpeg");

        let u = SelectedUpload::from_path("/tmp/scan.tiff");
        assert_eq!(u.mime_type, "");
    }

    #[tokio::test]
    async fn test_upload_source_read() {
        let data = UploadSource::Bytes(vec![1, 2, 3]).read().await.unwrap();
        assert_eq!(data, vec![1, 2, 3]);

        let missing = UploadSource::File("/nonexistent/photo.jpg".into()).read().await;
        assert!(missing.is_err());
    }
}
