use crate::config::Config;
use receipt::ReceiptPipeline;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Sale id to PDF; read-only, shared by all requests
    pub pipeline: Arc<ReceiptPipeline>,

    /// Limits concurrent receipt rendering
    pub render_semaphore: Arc<Semaphore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pipeline: ReceiptPipeline, config: Config) -> Self {
        let render_semaphore = Arc::new(Semaphore::new(config.server.max_concurrent_renders.max(1)));

        Self {
            pipeline: Arc::new(pipeline),
            render_semaphore,
            config: Arc::new(config),
        }
    }
}
