//! Notice and violation records.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::RemediationAction;

/// A single violation notice.
///
/// Field names follow the persisted JSON records (camelCase).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notice {
    /// Organization performing construction control
    pub org_name: String,

    /// Notice number, the stable external key
    pub notice_num: String,

    /// Date of the notice
    #[serde(with = "iso_date")]
    pub notice_date: Option<NaiveDate>,

    /// Addressee
    pub to_whom: String,

    /// Copy recipient
    pub copy_to: String,

    /// Inspecting specialist
    pub specialist: String,

    /// Parties present at the inspection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present: Option<String>,

    /// Object / site name
    pub object_name: String,

    /// Type of work being inspected
    pub work_type: String,

    /// Cited violations, in document order
    pub violations: Vec<Violation>,

    /// Required remediation
    pub actions: RemediationAction,

    /// How to respond
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<String>,

    /// Photo file names
    pub photos: Vec<String>,
}

impl Notice {
    /// Create an empty notice with the given number.
    pub fn new(notice_num: impl Into<String>) -> Self {
        Self {
            notice_num: notice_num.into(),
            ..Default::default()
        }
    }

    /// Parse a notice from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a list of notices from JSON.
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the notice to JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parties present, or an empty string.
    pub fn present_text(&self) -> &str {
        self.present.as_deref().unwrap_or_default()
    }

    /// Contact instructions, or an empty string.
    pub fn contacts_text(&self) -> &str {
        self.contacts.as_deref().unwrap_or_default()
    }

    /// Get the number of violations.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// One cited defect within a notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Violation {
    /// Where the violation was found
    pub place: String,

    /// Structural element concerned
    pub element: String,

    /// What exactly is wrong
    pub subject: String,

    /// Regulatory document, clause, project code, sheet
    pub norm: String,

    /// Remediation deadline
    #[serde(with = "iso_date")]
    pub deadline: Option<NaiveDate>,

    /// Free-text note
    pub note: Option<String>,
}

impl Violation {
    /// Create an empty violation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Note text, or an empty string.
    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or_default()
    }

    /// Check if the deadline precedes the given notice date.
    ///
    /// Absent dates never compare as early.
    pub fn is_deadline_before(&self, notice_date: Option<NaiveDate>) -> bool {
        matches!((self.deadline, notice_date), (Some(d), Some(n)) if d < n)
    }
}

/// UTC offset of the notice locale (Moscow time, no DST).
pub const NOTICE_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Parse a date typed by a user or stored by the backend.
///
/// Accepts `YYYY-MM-DD`, `DD.MM.YYYY`, and RFC 3339 timestamps. A timestamp
/// is read as the calendar date it falls on in the notice locale, so a
/// local midnight stored as `2024-03-04T21:00:00.000Z` is 5 March.
/// Empty input means "no date".
pub fn parse_date(value: &str) -> Option<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Some(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Some(date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%d.%m.%Y") {
        return Some(Some(date));
    }
    let instant = chrono::DateTime::parse_from_rfc3339(value).ok()?;
    let date = match FixedOffset::east_opt(NOTICE_UTC_OFFSET_SECS) {
        Some(tz) => instant.with_timezone(&tz).date_naive(),
        None => instant.date_naive(),
    };
    Some(Some(date))
}

/// ISO-8601 (de)serialization of optional calendar dates.
///
/// Dates are written as UTC-midnight instants (`2024-03-05T00:00:00.000Z`).
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Format a date the way it is submitted.
    pub fn to_iso(date: NaiveDate) -> String {
        format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
    }

    /// Serialize an optional date; `None` becomes `null`.
    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&to_iso(*d)),
            None => s.serialize_none(),
        }
    }

    /// Deserialize from a string, `null`, or a missing field.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) => super::parse_date(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid date: '{}'", s))),
        }
    }
}
