//! Sources of persisted photo bytes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::ImageOrigin;

/// Percent-encode one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// URL of a stored photo: the uploads base path plus the encoded name.
pub fn photo_url(base: &str, name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        encode_path_segment(name)
    )
}

/// Fetches the bytes of a persisted photo by its logical name.
#[async_trait]
pub trait PhotoFetcher: Send + Sync {
    /// Fetch the full content of the photo.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>>;

    /// Short description used in log messages.
    fn describe(&self) -> String {
        "photo store".to_string()
    }
}

/// Fetcher reading photos from a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Create a fetcher for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the photos are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if plain {
            Ok(self.root.join(name))
        } else {
            Err(Error::ImageResolution {
                name: name.to_string(),
                origin: ImageOrigin::Persisted,
                reason: "photo name is not a plain file name".to_string(),
            })
        }
    }
}

#[async_trait]
impl PhotoFetcher for DirectoryFetcher {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        Ok(tokio::fs::read(&path).await?)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// In-memory fetcher keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    photos: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a photo and return self.
    pub fn with_photo(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(name, data);
        self
    }

    /// Add or replace a photo.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.photos.insert(name.into(), data);
    }
}

#[async_trait]
impl PhotoFetcher for MemoryFetcher {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.photos.get(name).cloned().ok_or_else(|| Error::ImageResolution {
            name: name.to_string(),
            origin: ImageOrigin::Persisted,
            reason: "not found".to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} photos)", self.photos.len())
    }
}

#[cfg(feature = "http")]
pub use self::http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use super::*;

    /// Fetcher issuing `GET <base>/<name>` requests.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpFetcher {
        /// Create a fetcher for the given uploads base URL.
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                base_url: base_url.into(),
            }
        }

        /// Use an existing client.
        pub fn with_client(mut self, client: reqwest::Client) -> Self {
            self.client = client;
            self
        }
    }

    #[async_trait]
    impl PhotoFetcher for HttpFetcher {
        async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
            let url = photo_url(&self.base_url, name);
            log::debug!("GET {}", url);
            let response = self.client.get(&url).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }

        fn describe(&self) -> String {
            format!("uploads at {}", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_url() {
        assert_eq!(
            photo_url("http://host/uploads/", "фото 1.jpg"),
            "http://host/uploads/%D1%84%D0%BE%D1%82%D0%BE%201.jpg"
        );
        assert_eq!(photo_url("/uploads", "a.png"), "/uploads/a.png");
    }

    #[tokio::test]
    async fn test_directory_fetcher() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("a.jpg").await.unwrap(), vec![0xFF, 0xD8, 0xFF]);
        assert!(fetcher.fetch("missing.jpg").await.is_err());
        assert!(matches!(
            fetcher.fetch("../a.jpg").await,
            Err(Error::ImageResolution { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_fetcher() {
        let fetcher = MemoryFetcher::new().with_photo("a.png", vec![1]);
        assert_eq!(fetcher.fetch("a.png").await.unwrap(), vec![1]);
        assert!(fetcher.fetch("b.png").await.is_err());
    }
}
