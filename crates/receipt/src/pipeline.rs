//! Receipt generation pipeline

use crate::document::RenderedDocument;
use crate::model::SaleId;
use crate::projector::{project_sale, ReceiptData};
use crate::store::SaleStore;
use crate::template_store::TemplateStore;
use crate::Result;
use chrono::{DateTime, Utc};
use locale_text::Locale;
use pdf_core::{embed_logo, inspect_pdf, HtmlRenderer, LogoAsset, PdfOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Per-pipeline generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub locale: Locale,
    /// Prefix of generated file names
    pub document_type: String,
    pub pdf: PdfOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            document_type: "receipt".to_string(),
            pdf: PdfOptions::default(),
        }
    }
}

/// Sale id in, PDF out
///
/// Holds only shared read-only state, so one pipeline serves concurrent
/// requests; isolation between documents is the renderer's job.
pub struct ReceiptPipeline {
    store: Arc<dyn SaleStore>,
    templates: TemplateStore,
    logo: Option<LogoAsset>,
    renderer: Arc<dyn HtmlRenderer>,
    options: PipelineOptions,
}

impl ReceiptPipeline {
    pub fn new(
        store: Arc<dyn SaleStore>,
        templates: TemplateStore,
        logo: Option<LogoAsset>,
        renderer: Arc<dyn HtmlRenderer>,
        options: PipelineOptions,
    ) -> Self {
        if logo.is_none() {
            debug!("no logo asset, placeholder will be left as is");
        }
        Self {
            store,
            templates,
            logo,
            renderer,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<dyn SaleStore> {
        &self.store
    }

    pub fn renderer(&self) -> &Arc<dyn HtmlRenderer> {
        &self.renderer
    }

    /// Project a sale as of `now`
    pub async fn project(&self, id: SaleId, now: DateTime<Utc>) -> Result<ReceiptData> {
        project_sale(self.store.as_ref(), id, self.options.locale, now.date_naive()).await
    }

    /// Final HTML for a sale, logo inlined
    pub async fn render_html(&self, id: SaleId) -> Result<String> {
        self.render_html_at(id, Utc::now()).await
    }

    /// Final HTML for a sale as of `now`
    pub async fn render_html_at(&self, id: SaleId, now: DateTime<Utc>) -> Result<String> {
        let data = self.project(id, now).await?;
        let html = self.templates.render(&data)?;
        Ok(embed_logo(html, self.logo.as_ref()))
    }

    /// Generate the receipt PDF for a sale
    pub async fn generate(&self, id: SaleId) -> Result<RenderedDocument> {
        self.generate_at(id, Utc::now()).await
    }

    /// Generate the receipt PDF for a sale as of `now`
    ///
    /// Output that is not a parseable PDF is reported as a renderer failure.
    pub async fn generate_at(&self, id: SaleId, now: DateTime<Utc>) -> Result<RenderedDocument> {
        let started = Instant::now();
        let html = self.render_html_at(id, now).await?;
        debug!(sale_id = %id, html_bytes = html.len(), "receipt html rendered");

        let bytes = self.renderer.render_pdf(&html, &self.options.pdf).await?;
        let summary = inspect_pdf(&bytes)?;

        info!(
            sale_id = %id,
            pages = summary.page_count,
            bytes = summary.size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "receipt generated"
        );

        Ok(RenderedDocument::new(
            self.options.document_type.clone(),
            now,
            bytes,
        ))
    }
}
