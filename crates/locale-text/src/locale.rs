//! Supported locales and their labels

use crate::{LocaleTextError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Month names, January first
const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_IT: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Receipt locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "es")]
    Spanish,
}

impl Locale {
    /// BCP 47 language code
    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Italian => "it",
            Locale::Spanish => "es",
        }
    }

    /// Sentinel shown when a date is missing or unreadable
    pub fn no_date(self) -> &'static str {
        match self {
            Locale::English => "No date",
            Locale::Italian => "Nessuna data",
            Locale::Spanish => "Sin fecha",
        }
    }

    /// Status label for a settled installment
    pub fn paid(self) -> &'static str {
        match self {
            Locale::English => "Paid",
            Locale::Italian => "Pagato",
            Locale::Spanish => "Pagado",
        }
    }

    /// Status label for an open installment
    pub fn pending(self) -> &'static str {
        match self {
            Locale::English => "Pending",
            Locale::Italian => "In attesa",
            Locale::Spanish => "Pendiente",
        }
    }

    /// Label used when a sale's creator has neither a name nor an email
    pub fn unknown_agent(self) -> &'static str {
        match self {
            Locale::English => "Agent",
            Locale::Italian | Locale::Spanish => "Agente",
        }
    }

    /// Month name for `month` in 1..=12
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            Locale::English => &MONTHS_EN,
            Locale::Italian => &MONTHS_IT,
            Locale::Spanish => &MONTHS_ES,
        };
        if !(1..=12).contains(&month) {
            return "";
        }
        names[(month - 1) as usize]
    }
}

impl FromStr for Locale {
    type Err = LocaleTextError;

    fn from_str(s: &str) -> Result<Self> {
        let lang = s.split(['-', '_']).next().unwrap_or_default();
        match lang.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::English),
            "it" => Ok(Locale::Italian),
            "es" => Ok(Locale::Spanish),
            _ => Err(LocaleTextError::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
