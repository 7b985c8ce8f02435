//! The shared receipt template

use crate::projector::ReceiptData;
use crate::{ReceiptError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use template::Template;
use tracing::{debug, warn};

/// Legacy placeholder spellings and the key each one resolves to
///
/// Older templates use these; they are rewritten once at load time.
pub const KEY_ALIASES: [(&str, &str); 3] = [
    ("cuota", "cuotas"),
    ("dapagare", "daPagare"),
    ("codicefiscale", "codiceFiscale"),
];

/// A receipt template parsed once and shared read-only by every render
#[derive(Debug, Clone)]
pub struct TemplateStore {
    template: Arc<Template>,
    origin: String,
}

impl TemplateStore {
    /// Read and parse the template at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ReceiptError::MissingTemplate {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_source(&source, path.display().to_string())
    }

    /// Parse template source held in memory
    ///
    /// `origin` names the source in log lines.
    pub fn from_source(source: &str, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let mut template = Template::parse(source)?;

        for (alias, canonical) in KEY_ALIASES {
            let rewritten = template.rename_key(alias, canonical);
            if rewritten > 0 {
                warn!(
                    template = %origin,
                    alias,
                    canonical,
                    occurrences = rewritten,
                    "template uses legacy placeholder, rewriting"
                );
            }
        }

        debug!(template = %origin, keys = template.keys().len(), "template loaded");

        Ok(Self {
            template: Arc::new(template),
            origin,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Render receipt data into HTML (logo placeholder still unresolved)
    pub fn render(&self, data: &ReceiptData) -> Result<String> {
        Ok(self.template.render_serialize(data)?)
    }
}
