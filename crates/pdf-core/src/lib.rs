//! PDF Core - HTML to PDF rendering
//!
//! This crate provides functionality for:
//! - Inlining the logo image into rendered HTML as a `data:` URI
//! - Printing HTML to A4 PDF through a WebDriver-controlled headless browser
//! - Pooling browser sessions with one fresh tab per document
//! - Probing alternate browser launch configurations, and the pool itself for health checks
//! - Inspecting produced PDF bytes
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{BrowserPool, HtmlRenderer, LaunchConfig, LogoAsset, PdfOptions};
//!
//! let pool = BrowserPool::new(LaunchConfig::headless("http://localhost:9515"), 4);
//! let logo = LogoAsset::load("assets/logo.svg");
//! let html = pdf_core::embed_logo(rendered_html, logo.as_ref());
//! let pdf = pool.render_pdf(&html, &PdfOptions::default()).await?;
//! pool.shutdown().await;
//! ```

mod asset;
mod browser;
mod document;
mod options;
mod pool;
mod probe;

pub use asset::{detect_format, embed_logo, LogoAsset, LogoFormat, LOGO_PLACEHOLDER};
pub use browser::{BrowserSession, LaunchConfig};
pub use document::{has_pdf_header, inspect_pdf, PdfSummary, PDF_MAGIC};
pub use options::{PageMargins, PdfOptions};
pub use pool::{BrowserPool, PrintSession, SessionLauncher};
pub use probe::{probe_launch_configs, probe_renderer, ProbeAttempt, ProbeReport};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to launch browser session: {0}")]
    LaunchError(String),

    #[error("Browser command failed: {0}")]
    CommandError(String),

    #[error("Invalid print configuration: {0}")]
    PrintConfigError(String),

    #[error("Rendering did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Renderer produced invalid PDF: {0}")]
    InvalidOutput(String),

    #[error("Browser pool is closed")]
    PoolClosed,

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Turns a complete HTML document into PDF bytes
#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    /// Render `html` into a PDF buffer
    async fn render_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>>;
}
