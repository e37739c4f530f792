//! Field-level validation of notices.
//!
//! Validation is a pure function over a [`Notice`] value. Blocking issues
//! (missing required fields) prevent submission and export; advisories
//! (`earlyDeadline`) are reported but never block.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Notice, NoticeField, ViolationField};

/// Whether an issue blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks submission and export
    Blocking,
    /// Warn and allow
    Advisory,
}

/// Kind of validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// A required value is missing
    Required,
    /// Deadline precedes the notice date
    EarlyDeadline,
}

impl IssueKind {
    /// Severity of this kind of issue.
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::Required => Severity::Blocking,
            IssueKind::EarlyDeadline => Severity::Advisory,
        }
    }

    /// Error key as used by the form layer.
    pub fn key(&self) -> &'static str {
        match self {
            IssueKind::Required => "required",
            IssueKind::EarlyDeadline => "earlyDeadline",
        }
    }
}

/// Address of a field within a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum FieldPath {
    /// A notice-level field
    Notice {
        /// Field
        field: NoticeField,
    },
    /// A field of the violation at `index`
    Violation {
        /// Zero-based violation index
        index: usize,
        /// Field
        field: ViolationField,
    },
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Notice { field } => write!(f, "{}", field.name()),
            FieldPath::Violation { index, field } => {
                write!(f, "violations[{}].{}", index, field.name())
            }
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Where the issue was found
    pub path: FieldPath,
    /// What is wrong
    pub kind: IssueKind,
}

impl ValidationIssue {
    /// Severity of the issue.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Check if the issue blocks submission.
    pub fn is_blocking(&self) -> bool {
        self.severity() == Severity::Blocking
    }

    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self.kind {
            IssueKind::Required => "Обязательное поле не заполнено",
            IssueKind::EarlyDeadline => {
                "Дата уведомления позже, чем предлагаемый срок устранения"
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.kind.key(), self.message())
    }
}

/// Result of validating a notice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings in field order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Check if no issues were found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Check if any issue blocks submission.
    pub fn is_blocking(&self) -> bool {
        self.issues.iter().any(|i| i.is_blocking())
    }

    /// Blocking issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_blocking())
    }

    /// Advisory issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_blocking())
    }

    /// Check if an issue of the given kind exists at the given path.
    pub fn has(&self, path: FieldPath, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.path == path && i.kind == kind)
    }

    /// Turn blocking issues into an error; advisories pass through.
    pub fn into_result(self) -> crate::Result<ValidationReport> {
        if self.is_blocking() {
            Err(crate::Error::Validation(self))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Validate a notice.
///
/// Required: a non-empty notice number, and a deadline on every violation.
/// Advisory: `earlyDeadline` for each violation whose deadline precedes the
/// notice date.
pub fn validate(notice: &Notice) -> ValidationReport {
    let mut issues = Vec::new();

    if notice.notice_num.trim().is_empty() {
        issues.push(ValidationIssue {
            path: FieldPath::Notice {
                field: NoticeField::NoticeNum,
            },
            kind: IssueKind::Required,
        });
    }

    for index in 0..notice.violations.len() {
        issues.extend(check_violation(notice, index));
    }

    ValidationReport { issues }
}

/// Issues of a single violation, in field order.
pub(crate) fn check_violation(notice: &Notice, index: usize) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(violation) = notice.violations.get(index) else {
        return issues;
    };
    let path = FieldPath::Violation {
        index,
        field: ViolationField::Deadline,
    };

    if violation.deadline.is_none() {
        issues.push(ValidationIssue {
            path,
            kind: IssueKind::Required,
        });
    } else if violation.is_deadline_before(notice.notice_date) {
        issues.push(ValidationIssue {
            path,
            kind: IssueKind::EarlyDeadline,
        });
    }
    issues
}

/// Advisory issues for the given violations only.
pub(crate) fn early_deadlines(
    notice: &Notice,
    indices: impl IntoIterator<Item = usize>,
) -> Vec<ValidationIssue> {
    indices
        .into_iter()
        .flat_map(|i| check_violation(notice, i))
        .filter(|issue| issue.kind == IssueKind::EarlyDeadline)
        .collect()
}
