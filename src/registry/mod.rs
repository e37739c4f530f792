//! Registry view of stored notices.
//!
//! [`flatten`] turns notices into one row per violation (or one row for a
//! notice without violations). [`compute_span`] then marks, for the
//! notice-level columns, which rows render the value and how many rows it
//! spans. [`Registry`] keeps rows and spans together and recomputes the spans
//! whenever the visible row set changes.

mod filter;
mod span;

pub use filter::{normalize, GlobalFilter};
pub use span::{compute_span, runs_by, SpanCell, SpanMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::compose::format_short_date;
use crate::notice::{iso_date, Notice, RemediationAction, Violation};

/// One notice × violation pairing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRow {
    /// Position of the source notice in the flattened input
    pub source_index: usize,
    /// Position of the violation within its notice, `None` for a notice
    /// without violations
    pub violation_index: Option<usize>,

    pub org_name: String,
    pub notice_num: String,
    #[serde(with = "iso_date")]
    pub notice_date: Option<NaiveDate>,
    pub to_whom: String,
    pub copy_to: String,
    pub specialist: String,
    pub present: Option<String>,
    pub object_name: String,
    pub work_type: String,
    pub actions: RemediationAction,
    pub contacts: Option<String>,
    pub photos: Vec<String>,

    pub place: String,
    pub element: String,
    pub subject: String,
    pub norm: String,
    #[serde(with = "iso_date")]
    pub deadline: Option<NaiveDate>,
    pub note: Option<String>,
}

impl RegistryRow {
    fn from_parts(source_index: usize, notice: &Notice, violation: Option<(usize, &Violation)>) -> Self {
        let mut row = Self {
            source_index,
            violation_index: None,
            org_name: notice.org_name.clone(),
            notice_num: notice.notice_num.clone(),
            notice_date: notice.notice_date,
            to_whom: notice.to_whom.clone(),
            copy_to: notice.copy_to.clone(),
            specialist: notice.specialist.clone(),
            present: notice.present.clone(),
            object_name: notice.object_name.clone(),
            work_type: notice.work_type.clone(),
            actions: notice.actions.clone(),
            contacts: notice.contacts.clone(),
            photos: notice.photos.clone(),
            ..Default::default()
        };
        if let Some((index, v)) = violation {
            row.violation_index = Some(index);
            row.place = v.place.clone();
            row.element = v.element.clone();
            row.subject = v.subject.clone();
            row.norm = v.norm.clone();
            row.deadline = v.deadline;
            row.note = v.note.clone();
        }
        row
    }

    /// Check if the row carries a violation.
    pub fn has_violation(&self) -> bool {
        self.violation_index.is_some()
    }
}

/// Registry columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    OrgName,
    NoticeNum,
    NoticeDate,
    ToWhom,
    CopyTo,
    Specialist,
    ObjectName,
    WorkType,
    Place,
    Element,
    Subject,
    Norm,
    Deadline,
    Actions,
    Photos,
    Note,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 16] = [
        Column::OrgName,
        Column::NoticeNum,
        Column::NoticeDate,
        Column::ToWhom,
        Column::CopyTo,
        Column::Specialist,
        Column::ObjectName,
        Column::WorkType,
        Column::Place,
        Column::Element,
        Column::Subject,
        Column::Norm,
        Column::Deadline,
        Column::Actions,
        Column::Photos,
        Column::Note,
    ];

    /// Notice-level columns, shown once per run of rows.
    pub const GROUPED: [Column; 10] = [
        Column::OrgName,
        Column::NoticeNum,
        Column::NoticeDate,
        Column::ToWhom,
        Column::CopyTo,
        Column::Specialist,
        Column::ObjectName,
        Column::WorkType,
        Column::Actions,
        Column::Photos,
    ];

    /// Column header.
    pub fn header(&self) -> &'static str {
        match self {
            Column::OrgName => "Организация",
            Column::NoticeNum => "№ уведомл.",
            Column::NoticeDate => "Дата",
            Column::ToWhom => "Кому",
            Column::CopyTo => "Копия",
            Column::Specialist => "Специалист",
            Column::ObjectName => "Объект",
            Column::WorkType => "Вид работ",
            Column::Place => "Место",
            Column::Element => "Элемент",
            Column::Subject => "Предмет",
            Column::Norm => "НД (пункт)",
            Column::Deadline => "Срок",
            Column::Actions => "Действия",
            Column::Photos => "Фото нарушения",
            Column::Note => "Примечание",
        }
    }

    /// Record key of the column.
    pub fn key(&self) -> &'static str {
        match self {
            Column::OrgName => "orgName",
            Column::NoticeNum => "noticeNum",
            Column::NoticeDate => "noticeDate",
            Column::ToWhom => "toWhom",
            Column::CopyTo => "copyTo",
            Column::Specialist => "specialist",
            Column::ObjectName => "objectName",
            Column::WorkType => "workType",
            Column::Place => "place",
            Column::Element => "element",
            Column::Subject => "subject",
            Column::Norm => "norm",
            Column::Deadline => "deadline",
            Column::Actions => "actions",
            Column::Photos => "photos",
            Column::Note => "note",
        }
    }

    /// Look up a column by its record key.
    pub fn from_key(key: &str) -> Option<Column> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Check if the column holds a notice-level value.
    pub fn is_grouped(&self) -> bool {
        Self::GROUPED.contains(self)
    }

    /// Display value of the column for a row.
    ///
    /// Dates use `dd.MM.yyyy`; photo names are joined with ", ".
    pub fn value(&self, row: &RegistryRow) -> String {
        let date = |d: Option<NaiveDate>| d.map(format_short_date).unwrap_or_default();
        match self {
            Column::OrgName => row.org_name.clone(),
            Column::NoticeNum => row.notice_num.clone(),
            Column::NoticeDate => date(row.notice_date),
            Column::ToWhom => row.to_whom.clone(),
            Column::CopyTo => row.copy_to.clone(),
            Column::Specialist => row.specialist.clone(),
            Column::ObjectName => row.object_name.clone(),
            Column::WorkType => row.work_type.clone(),
            Column::Place => row.place.clone(),
            Column::Element => row.element.clone(),
            Column::Subject => row.subject.clone(),
            Column::Norm => row.norm.clone(),
            Column::Deadline => date(row.deadline),
            Column::Actions => row.actions.to_string(),
            Column::Photos => row.photos.join(", "),
            Column::Note => row.note.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Flatten notices into registry rows.
///
/// Each notice contributes one row per violation, or exactly one row with
/// empty violation fields when it has none. Order is notice order, then
/// violation order.
pub fn flatten(notices: &[Notice]) -> Vec<RegistryRow> {
    let mut rows = Vec::with_capacity(notices.iter().map(|n| n.violations.len().max(1)).sum());
    for (i, notice) in notices.iter().enumerate() {
        if notice.violations.is_empty() {
            rows.push(RegistryRow::from_parts(i, notice, None));
        } else {
            rows.extend(
                notice
                    .violations
                    .iter()
                    .enumerate()
                    .map(|(j, v)| RegistryRow::from_parts(i, notice, Some((j, v)))),
            );
        }
    }
    rows
}

/// A loaded registry: the notices, their rows, and the spans of the rows
/// currently visible.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    notices: Vec<Notice>,
    rows: Vec<RegistryRow>,
    columns: Vec<Column>,
    filter: GlobalFilter,
    visible: Vec<usize>,
    spans: SpanMap,
}

impl Registry {
    /// Load a notice list. All columns are selected and no filter is set.
    pub fn load(notices: Vec<Notice>) -> Self {
        let rows = flatten(&notices);
        log::debug!("Registry loaded: {} notices, {} rows", notices.len(), rows.len());
        let mut registry = Self {
            notices,
            rows,
            columns: Column::ALL.to_vec(),
            ..Default::default()
        };
        registry.refresh();
        registry
    }

    /// All notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// All rows, ignoring the filter.
    pub fn all_rows(&self) -> &[RegistryRow] {
        &self.rows
    }

    /// Rows passing the current filter.
    pub fn rows(&self) -> impl Iterator<Item = &RegistryRow> {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    /// Number of visible rows.
    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    /// Spans of the visible rows; row indices refer to [`Registry::rows`].
    pub fn spans(&self) -> &SpanMap {
        &self.spans
    }

    /// Selected columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Select the columns to display. Order follows the display order.
    pub fn select_columns(&mut self, columns: &[Column]) {
        self.columns = Column::ALL
            .into_iter()
            .filter(|c| columns.contains(c))
            .collect();
        self.refresh();
    }

    /// Set the global filter; an empty query shows every row.
    pub fn set_filter(&mut self, query: &str) {
        self.filter = GlobalFilter::new(query);
        self.refresh();
    }

    /// Remove the filter.
    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    /// Source notice of a visible row.
    pub fn notice_for(&self, row: &RegistryRow) -> Option<&Notice> {
        self.notices.get(row.source_index)
    }

    /// Remove every notice with the given number and its rows. Returns the
    /// number of rows removed.
    pub fn remove_notice(&mut self, notice_num: &str) -> usize {
        let before = self.rows.len();
        self.notices.retain(|n| n.notice_num != notice_num);
        self.rows = flatten(&self.notices);
        self.refresh();
        let removed = before - self.rows.len();
        log::debug!("Removed notice '{}' ({} rows)", notice_num, removed);
        removed
    }

    fn refresh(&mut self) {
        self.visible = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| self.filter.matches(r, &self.columns))
            .map(|(i, _)| i)
            .collect();
        let visible: Vec<RegistryRow> = self.rows().cloned().collect();
        self.spans = compute_span(&visible, &Column::GROUPED);
    }
}
