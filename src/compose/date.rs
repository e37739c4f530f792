//! Russian date formatting used in notice documents.

use chrono::{Datelike, NaiveDate};

/// Month names in the genitive case, January first.
pub const RU_MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Format a date as `« DD »  <month>  YYYY г.`.
///
/// Note the two spaces on either side of the month name.
pub fn format_ru_date(date: NaiveDate) -> String {
    format!(
        "« {:02} »  {}  {} г.",
        date.day(),
        RU_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Format a date as `dd.MM.yyyy`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Long form of an optional date; absent dates become an empty string.
pub(crate) fn ru_or_empty(date: Option<NaiveDate>) -> String {
    date.map(format_ru_date).unwrap_or_default()
}

/// Short form of an optional date; absent dates become an empty string.
pub(crate) fn short_or_empty(date: Option<NaiveDate>) -> String {
    date.map(format_short_date).unwrap_or_default()
}
