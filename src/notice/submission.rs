//! Submission boundary: the payload sent to the notice backend and the
//! store abstraction that receives it.

use async_trait::async_trait;

use super::photos::PhotoSet;
use super::Notice;
use crate::error::{Error, Result};
use crate::model::ImageOrigin;

/// Multipart field name carrying the notice JSON.
pub const NOTICE_FIELD: &str = "notice";

/// Multipart field name carrying each uploaded photo.
pub const PHOTOS_FIELD: &str = "photos";

/// One uploaded file of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name
    pub field: &'static str,
    /// File name, equal to the photo's logical name
    pub file_name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Content
    pub data: Vec<u8>,
}

/// What is sent to the backend on save.
///
/// `notice_json` lists every photo name in canonical order; `files` carries
/// only the new uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    /// Serialized notice
    pub notice_json: String,
    /// New uploads
    pub files: Vec<FilePart>,
}

impl SubmissionPayload {
    /// Build a payload from a notice and its photo set.
    ///
    /// The notice's photo list is replaced by the photo set's names.
    pub async fn build(notice: &Notice, photos: &PhotoSet) -> Result<Self> {
        let mut notice = notice.clone();
        notice.photos = photos.names();

        let mut files = Vec::with_capacity(photos.selected.len());
        for upload in &photos.selected {
            let data = upload
                .source
                .read()
                .await
                .map_err(|e| Error::ImageResolution {
                    name: upload.name.clone(),
                    origin: ImageOrigin::Upload,
                    reason: e.to_string(),
                })?;
            files.push(FilePart {
                field: PHOTOS_FIELD,
                file_name: upload.name.clone(),
                mime_type: upload.mime_type.clone(),
                data,
            });
        }

        Ok(Self {
            notice_json: notice.to_json()?,
            files,
        })
    }

    /// Total size of the uploaded files in bytes.
    pub fn upload_size(&self) -> usize {
        self.files.iter().map(|f| f.data.len()).sum()
    }
}

/// Persistent storage of notices, keyed by notice number.
#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// All stored notices.
    async fn list(&self) -> Result<Vec<Notice>>;

    /// Create a new notice.
    async fn create(&self, payload: SubmissionPayload) -> Result<Notice>;

    /// Replace the notice stored under `notice_num`.
    async fn update(&self, notice_num: &str, payload: SubmissionPayload) -> Result<Notice>;

    /// Delete the notice stored under `notice_num`.
    async fn delete(&self, notice_num: &str) -> Result<()>;
}

#[cfg(feature = "http")]
pub use self::http::HttpNoticeStore;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use reqwest::multipart::{Form, Part};

    /// Notice store backed by the REST endpoint `<base>/notices`.
    #[derive(Debug, Clone)]
    pub struct HttpNoticeStore {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpNoticeStore {
        /// Create a store for the given API base URL.
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }
        }

        fn collection_url(&self) -> String {
            format!("{}/notices", self.base_url)
        }

        fn item_url(&self, notice_num: &str) -> String {
            format!(
                "{}/{}",
                self.collection_url(),
                crate::resolve::encode_path_segment(notice_num)
            )
        }

        fn form(payload: SubmissionPayload) -> Result<Form> {
            let mut form = Form::new().text(NOTICE_FIELD, payload.notice_json);
            for file in payload.files {
                let mut part = Part::bytes(file.data).file_name(file.file_name);
                if !file.mime_type.is_empty() {
                    part = part.mime_str(&file.mime_type)?;
                }
                form = form.part(file.field, part);
            }
            Ok(form)
        }

        async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }
            let body = response.text().await.unwrap_or_default();
            Err(Error::Submission(format!("{}: {}", status, body.trim())))
        }
    }

    #[async_trait]
    impl NoticeStore for HttpNoticeStore {
        async fn list(&self) -> Result<Vec<Notice>> {
            let response = self.client.get(self.collection_url()).send().await?;
            Ok(Self::check(response).await?.json().await?)
        }

        async fn create(&self, payload: SubmissionPayload) -> Result<Notice> {
            let response = self
                .client
                .post(self.collection_url())
                .multipart(Self::form(payload)?)
                .send()
                .await?;
            Ok(Self::check(response).await?.json().await?)
        }

        async fn update(&self, notice_num: &str, payload: SubmissionPayload) -> Result<Notice> {
            let response = self
                .client
                .put(self.item_url(notice_num))
                .multipart(Self::form(payload)?)
                .send()
                .await?;
            Ok(Self::check(response).await?.json().await?)
        }

        async fn delete(&self, notice_num: &str) -> Result<()> {
            let response = self.client.delete(self.item_url(notice_num)).send().await?;
            Self::check(response).await?;
            Ok(())
        }
    }

}
