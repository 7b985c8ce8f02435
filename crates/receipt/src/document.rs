//! Generated documents and their persistence

use crate::{ReceiptError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A PDF produced by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub document_type: String,
    pub created_at: DateTime<Utc>,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub const MIME: &'static str = "application/pdf";

    pub fn new(document_type: impl Into<String>, created_at: DateTime<Utc>, bytes: Vec<u8>) -> Self {
        Self {
            document_type: document_type.into(),
            created_at,
            bytes,
        }
    }

    /// `<type>-<timestamp>.pdf`, with `:` and `.` of the timestamp replaced by `-`
    ///
    /// e.g. `receipt-2025-01-22T10-15-30-123Z.pdf`
    pub fn file_name(&self) -> String {
        let stamp = self
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("{}-{}.pdf", self.document_type, stamp)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the document into `dir` atomically and return its final path
    ///
    /// Bytes go to a temporary file in the same directory which is then
    /// renamed, so a reader never sees a partial PDF.
    pub fn persist(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let target = dir.join(self.file_name());
        let persist_err = |source: std::io::Error| ReceiptError::Persist {
            path: target.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(persist_err)?;
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(persist_err)?;
        file.write_all(&self.bytes).map_err(persist_err)?;
        file.as_file().sync_all().map_err(persist_err)?;
        file.persist(&target).map_err(|e| persist_err(e.error))?;

        info!(path = %target.display(), bytes = self.bytes.len(), "document persisted");
        Ok(target)
    }
}
