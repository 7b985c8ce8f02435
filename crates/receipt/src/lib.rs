//! Receipt - sale receipts as PDF documents
//!
//! This crate provides:
//! - The sale data model and the `SaleStore` data-access seam (PostgreSQL and in-memory)
//! - Projection of a sale into the flat dictionary receipt templates read
//! - The shared, pre-parsed receipt template
//! - The generation pipeline: project, render, embed logo, print to PDF
//! - Atomic persistence of generated documents
//! - A retry policy for transient failures of remote calls
//! - The allow-list of resettable reference-data tables
//!
//! # Example
//!
//! ```ignore
//! use receipt::{PipelineOptions, ReceiptPipeline, SaleId, TemplateStore};
//!
//! let pipeline = ReceiptPipeline::new(
//!     store,
//!     TemplateStore::load("templates/receipt.html")?,
//!     pdf_core::LogoAsset::load("assets/logo.svg"),
//!     renderer,
//!     PipelineOptions::default(),
//! );
//! let document = pipeline.generate(SaleId(42)).await?;
//! document.persist("out/")?;
//! ```

mod document;
mod model;
mod pipeline;
mod projector;
mod reference;
mod retry;
pub mod store;
mod template_store;

pub use document::RenderedDocument;
pub use model::{Agent, Installment, Passenger, Sale, SaleId, SaleRecord, SubService};
pub use pipeline::{PipelineOptions, ReceiptPipeline};
pub use projector::{
    agent_display_name, project, project_sale, InstallmentLine, PassengerLine, ReceiptData,
};
pub use reference::ReferenceTable;
pub use retry::RetryPolicy;
pub use store::{MemorySaleStore, PgSaleStore, SaleStore};
pub use template_store::{TemplateStore, KEY_ALIASES};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a receipt
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Sale {0} not found")]
    NotFound(SaleId),

    #[error("Template not readable at {path}: {source}")]
    MissingTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] template::TemplateError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] pdf_core::PdfError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to persist document to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown reference table: {0}")]
    UnknownReferenceTable(String),
}

impl ReceiptError {
    /// Whether retrying the failed operation may succeed
    ///
    /// Missing records, template problems and renderer failures are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            ReceiptError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_)
            ),
            ReceiptError::Persist { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

/// Result type for receipt operations
pub type Result<T> = std::result::Result<T, ReceiptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_permanent() {
        assert!(!ReceiptError::NotFound(SaleId(1)).is_transient());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        assert!(ReceiptError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!ReceiptError::Database(sqlx::Error::RowNotFound).is_transient());
    }

    #[test]
    fn test_persist_kinds() {
        let transient = ReceiptError::Persist {
            path: PathBuf::from("out"),
            source: std::io::Error::from(std::io::ErrorKind::Interrupted),
        };
        let permanent = ReceiptError::Persist {
            path: PathBuf::from("out"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(transient.is_transient());
        assert!(!permanent.is_transient());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ReceiptError::NotFound(SaleId(7)).to_string(), "Sale 7 not found");
    }
}
