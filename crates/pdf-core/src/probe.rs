//! Health probing of browser launch configurations

use crate::browser::{BrowserSession, LaunchConfig};
use crate::document::{inspect_pdf, PdfSummary};
use crate::{HtmlRenderer, PdfError, PdfOptions, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Minimal page printed by the probe
const PROBE_HTML: &str = "<!DOCTYPE html><html><body style=\"background:#eef\"><p>probe</p></body></html>";

/// Outcome of one launch configuration
#[derive(Debug, Clone, Serialize)]
pub struct ProbeAttempt {
    pub profile: String,
    pub ok: bool,
    pub elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of probing a list of launch configurations
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Profile of the first configuration that printed successfully
    pub selected: Option<String>,
    pub attempts: Vec<ProbeAttempt>,
}

impl ProbeReport {
    pub fn is_healthy(&self) -> bool {
        self.selected.is_some()
    }
}

/// Try each configuration in order and stop at the first that prints a valid PDF
///
/// Failures here are expected on hosts where some profiles are unsupported,
/// so they are collected into the report rather than returned as errors.
pub async fn probe_launch_configs(configs: &[LaunchConfig], options: &PdfOptions) -> ProbeReport {
    let mut attempts = Vec::with_capacity(configs.len());

    for config in configs {
        let started = Instant::now();
        let outcome = probe_one(config, options).await;
        let elapsed_ms = started.elapsed().as_millis();

        match outcome {
            Ok(summary) => {
                info!(profile = %config.name, elapsed_ms, "browser probe succeeded");
                attempts.push(ProbeAttempt {
                    profile: config.name.clone(),
                    ok: true,
                    elapsed_ms,
                    pdf: Some(summary),
                    error: None,
                });
                return ProbeReport {
                    selected: Some(config.name.clone()),
                    attempts,
                };
            }
            Err(e) => {
                warn!(profile = %config.name, error = %e, "browser probe failed");
                attempts.push(ProbeAttempt {
                    profile: config.name.clone(),
                    ok: false,
                    elapsed_ms,
                    pdf: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    ProbeReport {
        selected: None,
        attempts,
    }
}

/// Print the probe page through an already configured renderer
///
/// Used for periodic health checks: a pooled renderer reuses its sessions, so
/// repeated checks never start more browsers than the pool allows.
pub async fn probe_renderer(renderer: &dyn HtmlRenderer, label: &str, options: &PdfOptions) -> ProbeReport {
    let started = Instant::now();
    let outcome = match renderer.render_pdf(PROBE_HTML, options).await {
        Ok(bytes) => inspect_pdf(&bytes),
        Err(e) => Err(e),
    };
    let elapsed_ms = started.elapsed().as_millis();

    let attempt = match outcome {
        Ok(summary) => ProbeAttempt {
            profile: label.to_string(),
            ok: true,
            elapsed_ms,
            pdf: Some(summary),
            error: None,
        },
        Err(e) => {
            warn!(profile = label, error = %e, "renderer probe failed");
            ProbeAttempt {
                profile: label.to_string(),
                ok: false,
                elapsed_ms,
                pdf: None,
                error: Some(e.to_string()),
            }
        }
    };

    ProbeReport {
        selected: attempt.ok.then(|| label.to_string()),
        attempts: vec![attempt],
    }
}

/// Launch, print and close one session, all within the load timeout
async fn probe_one(config: &LaunchConfig, options: &PdfOptions) -> Result<PdfSummary> {
    let timeout = options.load_timeout();
    let bytes = tokio::time::timeout(timeout, async {
        let session = BrowserSession::launch(config).await?;
        let printed = session.print_html(PROBE_HTML, options).await;
        let closed = session.close().await;

        let bytes = printed?;
        closed?;
        Ok::<_, PdfError>(bytes)
    })
    .await
    .map_err(|_| PdfError::Timeout(timeout))??;

    inspect_pdf(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_with_no_configs() {
        let report = probe_launch_configs(&[], &PdfOptions::default()).await;
        assert!(!report.is_healthy());
        assert!(report.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_probe_unreachable_driver_reports_failure() {
        // Port 9 (discard) is not a WebDriver endpoint
        let configs = LaunchConfig::fallbacks("http://127.0.0.1:9");
        let report = probe_launch_configs(&configs[..1], &PdfOptions::default()).await;
        assert!(!report.is_healthy());
        assert_eq!(report.attempts.len(), 1);
        assert!(!report.attempts[0].ok);
        assert!(report.attempts[0].error.is_some());
    }

    #[tokio::test]
    async fn test_probe_unresponsive_driver_times_out() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let options = PdfOptions {
            load_timeout_secs: 1,
            ..PdfOptions::default()
        };
        let configs = LaunchConfig::fallbacks(&format!("http://{addr}"));
        let started = Instant::now();
        let report = probe_launch_configs(&configs[..2], &options).await;

        assert!(!report.is_healthy());
        assert_eq!(report.attempts.len(), 2);
        assert!(report.attempts.iter().all(|a| a
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Rendering did not finish"))));
        assert!(started.elapsed() < std::time::Duration::from_secs(8));
    }

    struct StaticRenderer(std::result::Result<Vec<u8>, String>);

    #[async_trait::async_trait]
    impl HtmlRenderer for StaticRenderer {
        async fn render_pdf(&self, _html: &str, _options: &PdfOptions) -> Result<Vec<u8>> {
            match &self.0 {
                Ok(bytes) => Ok(bytes.clone()),
                Err(e) => Err(PdfError::LaunchError(e.clone())),
            }
        }
    }

    #[tokio::test]
    async fn test_probe_renderer_reports_failure() {
        let renderer = StaticRenderer(Err("no chrome".to_string()));
        let report = probe_renderer(&renderer, "pool", &PdfOptions::default()).await;

        assert!(!report.is_healthy());
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.attempts[0].profile, "pool");
        assert!(report.attempts[0].error.as_deref().unwrap().contains("no chrome"));
    }

    #[tokio::test]
    async fn test_probe_renderer_rejects_non_pdf() {
        let renderer = StaticRenderer(Ok(b"<html></html>".to_vec()));
        let report = probe_renderer(&renderer, "pool", &PdfOptions::default()).await;
        assert!(!report.is_healthy());
    }
}
