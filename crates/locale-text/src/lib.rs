//! Locale Text - labels and date formatting for receipts
//!
//! This crate provides:
//! - Supported receipt locales (English, Italian, Spanish)
//! - Localized status labels and sentinels ("Paid", "Pending", "No date")
//! - Lenient parsing of dates stored as text
//! - Short (day/month/year) and long (with month names) date formatting
//!
//! # Example
//!
//! ```
//! use locale_text::{format_date_short, parse_stored_date, Locale};
//!
//! let date = parse_stored_date("2025-03-05T00:00:00.000Z").unwrap();
//! assert_eq!(format_date_short(Locale::Italian, date), "5/3/2025");
//! assert_eq!(Locale::English.no_date(), "No date");
//! ```

mod formatter;
mod locale;

pub use formatter::{format_date_long, format_date_short, format_optional_date, parse_stored_date};
pub use locale::Locale;

use thiserror::Error;

/// Errors that can occur during locale handling
#[derive(Debug, Error)]
pub enum LocaleTextError {
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
}

/// Result type for locale operations
pub type Result<T> = std::result::Result<T, LocaleTextError>;
