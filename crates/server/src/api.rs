use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use pdf_core::{probe_renderer, ProbeReport};
use receipt::{RenderedDocument, SaleId};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/sales/:id/receipt.pdf", get(receipt_pdf))
        .route("/api/v1/sales/:id/receipt.html", get(receipt_html))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Generate the receipt PDF for a sale
pub async fn receipt_pdf(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let id = SaleId(id);
    tracing::info!(sale_id = %id, "receipt requested");

    let _permit = state
        .render_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let document = state.pipeline.generate(id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, RenderedDocument::MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", document.file_name()),
            ),
        ],
        document.bytes,
    ))
}

/// Rendered receipt HTML, logo inlined, without printing
pub async fn receipt_html(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    let html = state.pipeline.render_html(SaleId(id)).await?;
    Ok(Html(html))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: String,
    pub browser: ProbeReport,
}

/// Label of the pooled renderer in health reports
pub const POOL_PROFILE: &str = "pool";

/// Database reachability plus a test print; 503 if either fails
///
/// The test print goes through the pipeline's pooled renderer under a render permit.
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let database = match state.pipeline.store().health_check().await {
        Ok(()) => None,
        Err(e) => Some(e.to_string()),
    };

    let browser = {
        let _permit = state
            .render_semaphore
            .acquire()
            .await
            .map_err(|_| ServiceError::ServiceOverloaded)?;
        probe_renderer(
            state.pipeline.renderer().as_ref(),
            POOL_PROFILE,
            &state.pipeline.options().pdf,
        )
        .await
    };

    let healthy = database.is_none() && browser.is_healthy();
    if !healthy {
        tracing::warn!(
            database_error = database.as_deref().unwrap_or("none"),
            browser = browser.selected.as_deref().unwrap_or("none"),
            "health check failed"
        );
    }

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if healthy { "ok" } else { "unavailable" },
        database: database.unwrap_or_else(|| "ok".to_string()),
        browser,
    };

    Ok((status, Json(body)))
}
