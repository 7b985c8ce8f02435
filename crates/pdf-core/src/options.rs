//! Print options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest accepted margin in millimetres
pub const MIN_MARGIN_MM: f64 = 5.0;
/// Largest accepted margin in millimetres
pub const MAX_MARGIN_MM: f64 = 10.0;

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PageMargins {
    /// Same margin on all four sides
    pub fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }

    /// Margins clamped to the 5-10 mm range
    pub fn clamped(self) -> Self {
        let clamp = |mm: f64| {
            if mm.is_nan() {
                MIN_MARGIN_MM
            } else {
                mm.clamp(MIN_MARGIN_MM, MAX_MARGIN_MM)
            }
        };
        Self {
            top: clamp(self.top),
            right: clamp(self.right),
            bottom: clamp(self.bottom),
            left: clamp(self.left),
        }
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::uniform(8.0)
    }
}

/// Options for printing a page to PDF
///
/// Paper size is always A4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    /// Page margins in millimetres, clamped to 5-10 mm when printing
    pub margins: PageMargins,
    /// Print CSS backgrounds
    pub background: bool,
    /// Maximum time to wait for the page to finish loading
    pub load_timeout_secs: u64,
}

impl PdfOptions {
    /// Load timeout as a `Duration`
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            margins: PageMargins::default(),
            background: true,
            load_timeout_secs: 30,
        }
    }
}
