//! Editable notice state.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::photos::{update_photo_set, PhotoChange, PhotoSet};
use super::submission::{NoticeStore, SubmissionPayload};
use super::validate::{self, ValidationIssue, ValidationReport};
use super::{parse_date, Notice, RemediationAction, Violation};
use crate::error::{Error, Result};

/// Editable notice-level fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeField {
    OrgName,
    NoticeNum,
    NoticeDate,
    ToWhom,
    CopyTo,
    Specialist,
    Present,
    ObjectName,
    WorkType,
    Actions,
    Contacts,
}

impl NoticeField {
    /// All fields in form order.
    pub const ALL: [NoticeField; 11] = [
        NoticeField::OrgName,
        NoticeField::NoticeNum,
        NoticeField::NoticeDate,
        NoticeField::ToWhom,
        NoticeField::CopyTo,
        NoticeField::Specialist,
        NoticeField::Present,
        NoticeField::ObjectName,
        NoticeField::WorkType,
        NoticeField::Actions,
        NoticeField::Contacts,
    ];

    /// Record key of the field.
    pub fn name(&self) -> &'static str {
        match self {
            NoticeField::OrgName => "orgName",
            NoticeField::NoticeNum => "noticeNum",
            NoticeField::NoticeDate => "noticeDate",
            NoticeField::ToWhom => "toWhom",
            NoticeField::CopyTo => "copyTo",
            NoticeField::Specialist => "specialist",
            NoticeField::Present => "present",
            NoticeField::ObjectName => "objectName",
            NoticeField::WorkType => "workType",
            NoticeField::Actions => "actions",
            NoticeField::Contacts => "contacts",
        }
    }
}

impl FromStr for NoticeField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::invalid_field(s, s, "unknown notice field"))
    }
}

/// Editable violation fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationField {
    Place,
    Element,
    Subject,
    Norm,
    Deadline,
    Note,
}

impl ViolationField {
    /// All fields in form order.
    pub const ALL: [ViolationField; 6] = [
        ViolationField::Place,
        ViolationField::Element,
        ViolationField::Subject,
        ViolationField::Norm,
        ViolationField::Deadline,
        ViolationField::Note,
    ];

    /// Record key of the field.
    pub fn name(&self) -> &'static str {
        match self {
            ViolationField::Place => "place",
            ViolationField::Element => "element",
            ViolationField::Subject => "subject",
            ViolationField::Norm => "norm",
            ViolationField::Deadline => "deadline",
            ViolationField::Note => "note",
        }
    }
}

impl FromStr for ViolationField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::invalid_field(s, s, "unknown violation field"))
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn date_value(field: &str, value: &str) -> Result<Option<chrono::NaiveDate>> {
    parse_date(value).ok_or_else(|| Error::invalid_field(field, value, "expected a date"))
}

/// A notice being created or edited, plus its photo selection.
///
/// A fresh draft always holds at least one violation.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeDraft {
    notice: Notice,
    photos: PhotoSet,
    edit_target: Option<String>,
}

impl Default for NoticeDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeDraft {
    /// Create an empty draft with one empty violation.
    pub fn new() -> Self {
        let mut notice = Notice::default();
        notice.violations.push(Violation::new());
        Self {
            notice,
            photos: PhotoSet::new(),
            edit_target: None,
        }
    }

    /// Start editing an existing record.
    ///
    /// Its photos become persisted entries and its number becomes the key
    /// the update is sent to.
    pub fn from_record(notice: Notice) -> Self {
        let photos = PhotoSet::from_persisted(notice.photos.iter().cloned());
        let edit_target = Some(notice.notice_num.clone());
        let mut notice = notice;
        if notice.violations.is_empty() {
            notice.violations.push(Violation::new());
        }
        Self {
            notice,
            photos,
            edit_target,
        }
    }

    /// Start a new record prefilled from `notice`. Submitting creates it.
    pub fn prefilled(notice: Notice) -> Self {
        let mut draft = Self::from_record(notice);
        draft.edit_target = None;
        draft
    }

    /// Current notice value. Its `photos` list may be stale; use
    /// [`NoticeDraft::photo_names`] for the current selection.
    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    /// Current photo set.
    pub fn photos(&self) -> &PhotoSet {
        &self.photos
    }

    /// Number of the record being edited, if any.
    pub fn edit_target(&self) -> Option<&str> {
        self.edit_target.as_deref()
    }

    /// Check if the draft edits an existing record.
    pub fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    /// Append an empty violation and return its index.
    pub fn add_violation(&mut self) -> usize {
        self.notice.violations.push(Violation::new());
        self.notice.violations.len() - 1
    }

    /// Remove the last violation. Does nothing on an empty list.
    pub fn remove_last_violation(&mut self) -> Option<Violation> {
        self.notice.violations.pop()
    }

    /// Set a notice-level field from its text value.
    ///
    /// Changing the notice date re-checks every violation deadline and
    /// returns the resulting advisories.
    pub fn set_field(&mut self, field: NoticeField, value: &str) -> Result<Vec<ValidationIssue>> {
        let n = &mut self.notice;
        match field {
            NoticeField::OrgName => n.org_name = value.to_string(),
            NoticeField::NoticeNum => n.notice_num = value.to_string(),
            NoticeField::NoticeDate => {
                n.notice_date = date_value(field.name(), value)?;
                let advisories = validate::early_deadlines(n, 0..n.violations.len());
                for issue in &advisories {
                    log::warn!("{}", issue);
                }
                return Ok(advisories);
            }
            NoticeField::ToWhom => n.to_whom = value.to_string(),
            NoticeField::CopyTo => n.copy_to = value.to_string(),
            NoticeField::Specialist => n.specialist = value.to_string(),
            NoticeField::Present => n.present = optional_text(value),
            NoticeField::ObjectName => n.object_name = value.to_string(),
            NoticeField::WorkType => n.work_type = value.to_string(),
            NoticeField::Actions => n.actions = RemediationAction::from(value),
            NoticeField::Contacts => n.contacts = optional_text(value),
        }
        Ok(Vec::new())
    }

    /// Set a field of the violation at `index` from its text value.
    ///
    /// Changing a deadline returns that violation's advisories.
    pub fn set_violation_field(
        &mut self,
        index: usize,
        field: ViolationField,
        value: &str,
    ) -> Result<Vec<ValidationIssue>> {
        let count = self.notice.violations.len();
        let v = self.notice.violations.get_mut(index).ok_or_else(|| {
            Error::invalid_field(
                format!("violations[{}]", index),
                value,
                format!("only {} violations", count),
            )
        })?;

        match field {
            ViolationField::Place => v.place = value.to_string(),
            ViolationField::Element => v.element = value.to_string(),
            ViolationField::Subject => v.subject = value.to_string(),
            ViolationField::Norm => v.norm = value.to_string(),
            ViolationField::Note => v.note = optional_text(value),
            ViolationField::Deadline => {
                v.deadline = date_value(field.name(), value)?;
                let advisories = validate::early_deadlines(&self.notice, [index]);
                for issue in &advisories {
                    log::warn!("{}", issue);
                }
                return Ok(advisories);
            }
        }
        Ok(Vec::new())
    }

    /// Replace the remediation action.
    pub fn set_action(&mut self, action: RemediationAction) {
        self.notice.actions = action;
    }

    /// Apply photo selection changes.
    pub fn apply_photo_changes(&mut self, changes: &[PhotoChange]) {
        self.photos = update_photo_set(&self.photos, changes);
    }

    /// Photo names in canonical order (persisted, then new uploads).
    pub fn photo_names(&self) -> Vec<String> {
        self.photos.names()
    }

    /// The notice with its photo list brought up to date.
    pub fn to_notice(&self) -> Notice {
        let mut notice = self.notice.clone();
        notice.photos = self.photo_names();
        notice
    }

    /// Validate the current state.
    pub fn validate(&self) -> ValidationReport {
        validate::validate(&self.notice)
    }

    /// Reset to a fresh draft: one empty violation, no photos, no target.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Validate and send the draft to a store.
    ///
    /// Creates a new record, or updates the one being edited. On success the
    /// uploads become persisted and the draft keeps editing the saved
    /// record. On failure the draft is left unchanged.
    pub async fn submit(&mut self, store: &dyn NoticeStore) -> Result<Notice> {
        let report = self.validate().into_result()?;
        for issue in report.warnings() {
            log::warn!("Submitting with advisory: {}", issue);
        }

        let notice = self.to_notice();
        let payload = SubmissionPayload::build(&notice, &self.photos).await?;

        let saved = match &self.edit_target {
            Some(target) => {
                log::info!("Updating notice '{}'", target);
                store.update(target, payload).await
            }
            None => {
                log::info!("Creating notice '{}'", notice.notice_num);
                store.create(payload).await
            }
        }
        .map_err(|e| match e {
            Error::Submission(_) => e,
            other => Error::Submission(other.to_string()),
        })?;

        self.photos.mark_persisted();
        self.edit_target = Some(saved.notice_num.clone());
        self.notice = saved.clone();
        if self.notice.violations.is_empty() {
            self.notice.violations.push(Violation::new());
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{IssueKind, SelectedUpload};
    use chrono::NaiveDate;

    #[test]
    fn test_new_draft_has_one_violation() {
        let draft = NoticeDraft::new();
        assert_eq!(draft.notice().violations.len(), 1);
        assert!(!draft.is_editing());
    }

    #[test]
    fn test_add_and_remove_violations() {
        let mut draft = NoticeDraft::new();
        assert_eq!(draft.add_violation(), 1);
        assert!(draft.remove_last_violation().is_some());
        assert!(draft.remove_last_violation().is_some());
        assert!(draft.remove_last_violation().is_none());
        assert!(draft.notice().violations.is_empty());
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in NoticeField::ALL {
            assert_eq!(field.name().parse::<NoticeField>().unwrap(), field);
        }
        for field in ViolationField::ALL {
            assert_eq!(field.name().parse::<ViolationField>().unwrap(), field);
        }
        assert!("nope".parse::<NoticeField>().is_err());
    }

    #[test]
    fn test_date_change_reports_early_deadlines() {
        let mut draft = NoticeDraft::new();
        draft
            .set_violation_field(0, ViolationField::Deadline, "2024-03-01")
            .unwrap();
        let advisories = draft
            .set_field(NoticeField::NoticeDate, "05.03.2024")
            .unwrap();
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].kind, IssueKind::EarlyDeadline);

        let advisories = draft
            .set_violation_field(0, ViolationField::Deadline, "2024-03-10")
            .unwrap();
        assert!(advisories.is_empty());
    }

    #[test]
    fn test_invalid_values() {
        let mut draft = NoticeDraft::new();
        assert!(draft.set_field(NoticeField::NoticeDate, "завтра").is_err());
        assert!(draft
            .set_violation_field(3, ViolationField::Place, "ось 1")
            .is_err());
    }

    #[test]
    fn test_optional_fields() {
        let mut draft = NoticeDraft::new();
        draft.set_field(NoticeField::Present, "   ").unwrap();
        assert_eq!(draft.notice().present, None);
        draft.set_field(NoticeField::Actions, "stop").unwrap();
        assert_eq!(draft.notice().actions, RemediationAction::SuspendWork);
    }

    #[test]
    fn test_from_record_and_clear() {
        let mut notice = Notice::new("7");
        notice.photos = vec!["a.jpg".into()];
        notice.notice_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        let mut draft = NoticeDraft::from_record(notice);
        assert_eq!(draft.edit_target(), Some("7"));
        assert_eq!(draft.notice().violations.len(), 1);

        draft.apply_photo_changes(&[PhotoChange::Select(vec![SelectedUpload::from_bytes(
            "b.jpg",
            "image/jpeg",
            vec![0xFF, 0xD8, 0xFF],
        )])]);
        assert_eq!(draft.to_notice().photos, vec!["a.jpg", "b.jpg"]);

        draft.clear();
        assert_eq!(draft, NoticeDraft::new());
    }

    #[test]
    fn test_prefilled_creates() {
        let draft = NoticeDraft::prefilled(Notice::new("8"));
        assert!(!draft.is_editing());
        assert_eq!(draft.notice().notice_num, "8");
    }
}
