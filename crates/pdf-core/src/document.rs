//! Inspection of produced PDF bytes

use crate::{PdfError, Result};
use serde::Serialize;

/// Every PDF file starts with these bytes
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Basic facts about a PDF buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfSummary {
    /// Header version, e.g. "1.4"
    pub version: String,
    /// Number of pages
    pub page_count: usize,
    /// Size in bytes
    pub size: usize,
}

/// Check the `%PDF-` header
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Parse a PDF buffer and summarize it
///
/// Fails if the buffer has no PDF header, does not parse, or has no pages.
pub fn inspect_pdf(bytes: &[u8]) -> Result<PdfSummary> {
    if !has_pdf_header(bytes) {
        return Err(PdfError::InvalidOutput(format!(
            "missing %PDF- header ({} bytes)",
            bytes.len()
        )));
    }

    let doc = lopdf::Document::load_mem(bytes)?;
    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(PdfError::InvalidOutput("document has no pages".to_string()));
    }

    Ok(PdfSummary {
        version: doc.version.clone(),
        page_count,
        size: bytes.len(),
    })
}
