//! Notice records, editing state, validation and submission.

mod action;
mod draft;
mod photos;
mod record;
mod submission;
mod validate;

pub use action::RemediationAction;
pub use draft::{NoticeDraft, NoticeField, ViolationField};
pub use photos::{
    update_photo_set, PhotoChange, PhotoEntry, PhotoSet, SelectedUpload, UploadSource,
};
pub use record::{iso_date, parse_date, Notice, Violation};
#[cfg(feature = "http")]
pub use submission::HttpNoticeStore;
pub use submission::{FilePart, NoticeStore, SubmissionPayload, NOTICE_FIELD, PHOTOS_FIELD};
pub use validate::{
    validate, FieldPath, IssueKind, Severity, ValidationIssue, ValidationReport,
};
