//! Date parsing and formatting

use crate::Locale;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Date-time layouts seen in stored values, tried in order
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts seen in stored values, tried in order
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a date stored as text
///
/// Accepts RFC 3339 timestamps (`2025-03-05T10:00:00.000Z`), naive date-times,
/// ISO dates (`2025-03-05`) and day-first dates (`05/03/2025`).
/// Returns `None` for anything else, including the empty string.
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        })
}

/// Format a date as day/month/year
///
/// English pads day and month (`05/03/2025`); Italian and Spanish do not (`5/3/2025`).
pub fn format_date_short(locale: Locale, date: NaiveDate) -> String {
    match locale {
        Locale::English => date.format("%d/%m/%Y").to_string(),
        Locale::Italian | Locale::Spanish => {
            format!("{}/{}/{}", date.day(), date.month(), date.year())
        }
    }
}

/// Format a date with the month spelled out (e.g., "5 marzo 2025")
pub fn format_date_long(locale: Locale, date: NaiveDate) -> String {
    let day = date.day();
    let month = locale.month_name(date.month());
    let year = date.year();
    match locale {
        Locale::English | Locale::Italian => format!("{day} {month} {year}"),
        Locale::Spanish => format!("{day} de {month} de {year}"),
    }
}

/// Format an optional stored date, falling back to the locale's "no date" sentinel
pub fn format_optional_date(locale: Locale, raw: Option<&str>) -> String {
    raw.and_then(parse_stored_date)
        .map(|date| format_date_short(locale, date))
        .unwrap_or_else(|| locale.no_date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_stored_date("2025-03-05T10:30:00.000Z"),
            Some(date(2025, 3, 5))
        );
        assert_eq!(
            parse_stored_date("2025-03-05T23:30:00+01:00"),
            Some(date(2025, 3, 5))
        );
    }

    #[test]
    fn test_parse_naive_formats() {
        assert_eq!(parse_stored_date("2025-03-05 10:30:00"), Some(date(2025, 3, 5)));
        assert_eq!(parse_stored_date("2025-03-05T10:30:00"), Some(date(2025, 3, 5)));
        assert_eq!(parse_stored_date(" 2025-03-05 "), Some(date(2025, 3, 5)));
        assert_eq!(parse_stored_date("05/03/2025"), Some(date(2025, 3, 5)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_stored_date("not-a-date"), None);
        assert_eq!(parse_stored_date(""), None);
        assert_eq!(parse_stored_date("2025-13-40"), None);
    }

    #[test]
    fn test_format_date_short() {
        assert_eq!(format_date_short(Locale::English, date(2025, 3, 5)), "05/03/2025");
        assert_eq!(format_date_short(Locale::Italian, date(2025, 3, 5)), "5/3/2025");
        assert_eq!(format_date_short(Locale::Spanish, date(2025, 12, 31)), "31/12/2025");
    }

    #[test]
    fn test_format_date_long() {
        assert_eq!(format_date_long(Locale::English, date(2025, 1, 22)), "22 January 2025");
        assert_eq!(format_date_long(Locale::Italian, date(2025, 1, 22)), "22 gennaio 2025");
        assert_eq!(format_date_long(Locale::Spanish, date(2025, 1, 22)), "22 de enero de 2025");
    }

    #[test]
    fn test_format_optional_date() {
        assert_eq!(format_optional_date(Locale::English, Some("not-a-date")), "No date");
        assert_eq!(format_optional_date(Locale::English, Some("2025-03-05")), "05/03/2025");
    }
}
