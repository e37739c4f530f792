//! Remediation action vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the addressee is required to do.
///
/// Either one of the canned phrases offered by the notice form or free text.
/// Serialized as the phrase itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemediationAction {
    /// Fix the cited violations by the given deadlines
    FixViolations,
    /// Provide the required documents by the given deadlines
    ProvideDocuments,
    /// Suspend work until the violations are fixed
    SuspendWork,
    /// Free text ("Другое...")
    Custom(String),
    /// Nothing chosen yet
    #[default]
    Unset,
}

impl RemediationAction {
    /// Canned options in the order the form offers them, with their codes.
    pub const CANNED: [(&'static str, RemediationAction); 3] = [
        ("fix1", RemediationAction::FixViolations),
        ("fix2", RemediationAction::ProvideDocuments),
        ("stop", RemediationAction::SuspendWork),
    ];

    /// Label of the free-text option.
    pub const OTHER_LABEL: &'static str = "Другое...";

    /// Phrase inserted after "необходимо:" in the document.
    pub fn phrase(&self) -> &str {
        match self {
            RemediationAction::FixViolations => "устранить выявленные нарушения в указанный срок",
            RemediationAction::ProvideDocuments => {
                "предоставить требуемые документы в установленный срок."
            }
            RemediationAction::SuspendWork => "приостановить работы до устранения",
            RemediationAction::Custom(text) => text,
            RemediationAction::Unset => "",
        }
    }

    /// Option code (`fix1`, `fix2`, `stop`, `other`), if any.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            RemediationAction::FixViolations => Some("fix1"),
            RemediationAction::ProvideDocuments => Some("fix2"),
            RemediationAction::SuspendWork => Some("stop"),
            RemediationAction::Custom(_) => Some("other"),
            RemediationAction::Unset => None,
        }
    }

    /// Check if one of the canned phrases was chosen.
    pub fn is_canned(&self) -> bool {
        matches!(
            self,
            RemediationAction::FixViolations
                | RemediationAction::ProvideDocuments
                | RemediationAction::SuspendWork
        )
    }

    /// Check if nothing was chosen.
    pub fn is_unset(&self) -> bool {
        matches!(self, RemediationAction::Unset)
    }
}

impl From<String> for RemediationAction {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return RemediationAction::Unset;
        }
        for (code, action) in Self::CANNED {
            if trimmed == code || trimmed == action.phrase() {
                return action;
            }
        }
        RemediationAction::Custom(value)
    }
}

impl From<&str> for RemediationAction {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RemediationAction> for String {
    fn from(action: RemediationAction) -> Self {
        match action {
            RemediationAction::Custom(text) => text,
            other => other.phrase().to_string(),
        }
    }
}

impl fmt::Display for RemediationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}
