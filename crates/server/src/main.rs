use clap::{Parser, Subcommand};
use pdf_core::{probe_launch_configs, BrowserPool, HtmlRenderer, LaunchConfig, LogoAsset};
use receipt::{PgSaleStore, ReceiptError, ReceiptPipeline, ReferenceTable, SaleId, TemplateStore};
use receipt_server::{api::build_router, config::Config, state::AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "receipt-server")]
#[command(about = "Sale receipts as PDF documents")]
struct Cli {
    /// Config file (TOML); defaults to $RECEIPT_CONFIG or config/default.toml
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,

    /// Generate one receipt and write it to disk
    Render {
        /// Sale identifier
        #[arg(long)]
        sale_id: i64,

        /// Output directory; defaults to documents.output_dir
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Try each browser launch profile and report which one prints
    Probe,

    /// Delete every row of a reference-data table
    ResetReference {
        /// One of: payment_methods, airlines, tour_operators, destinations, departure_points
        table: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    tracing::info!("Configuration loaded");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Render { sale_id, out } => render(config, SaleId(sale_id), out).await,
        Commands::Probe => probe(config).await,
        Commands::ResetReference { table } => reset_reference(config, &table).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting receipt service...");

    let (pipeline, pool) = build_pipeline(&config).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(pipeline, config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Receipt service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /api/v1/sales/:id/receipt.pdf");
    tracing::info!("  - GET /api/v1/sales/:id/receipt.html");
    tracing::info!("  - GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.shutdown().await;
    tracing::info!("Receipt service stopped");
    Ok(())
}

async fn render(config: Config, id: SaleId, out: Option<PathBuf>) -> anyhow::Result<()> {
    let out = out.unwrap_or_else(|| config.documents.output_dir.clone());
    let (pipeline, pool) = build_pipeline(&config).await?;

    let result = pipeline.generate(id).await;
    pool.shutdown().await;
    let document = result?;

    let (document, out) = (&document, out.as_path());
    let path = config
        .retry
        .run(move || async move { document.persist(out) }, ReceiptError::is_transient)
        .await?;

    println!("{}", path.display());
    Ok(())
}

async fn probe(config: Config) -> anyhow::Result<()> {
    let report = probe_launch_configs(&config.browser.launch_configs(), &config.pdf.to_options()).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_healthy() {
        anyhow::bail!("no browser launch profile could print a PDF");
    }
    Ok(())
}

async fn reset_reference(config: Config, table: &str) -> anyhow::Result<()> {
    let table: ReferenceTable = table.parse()?;
    let store = connect_store(&config).await?;

    let deleted = store.reset_reference_table(table).await?;
    store.close().await;

    tracing::info!(table = %table, deleted, "reference table reset");
    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<PgSaleStore> {
    let url = config.database.url.as_str();
    let max_connections = config.database.max_connections;

    let store = config
        .retry
        .run(
            move || PgSaleStore::connect(url, max_connections),
            ReceiptError::is_transient,
        )
        .await?;

    if config.database.run_migrations {
        store.run_migrations().await?;
    }
    tracing::info!("Database connected");
    Ok(store)
}

/// Store, template, logo and browser pool wired into a pipeline
async fn build_pipeline(config: &Config) -> anyhow::Result<(ReceiptPipeline, Arc<BrowserPool>)> {
    let store = connect_store(config).await?;
    let templates = TemplateStore::load(&config.documents.template_path)?;
    let logo = config
        .documents
        .logo_path
        .as_ref()
        .and_then(|path| LogoAsset::load(path));

    let launch = select_launch_config(config).await;
    tracing::info!(
        profile = %launch.name,
        max_sessions = config.browser.max_sessions,
        "Browser pool configured"
    );
    let pool = Arc::new(BrowserPool::new(launch, config.browser.max_sessions));
    let renderer: Arc<dyn HtmlRenderer> = pool.clone();

    let pipeline = ReceiptPipeline::new(
        Arc::new(store),
        templates,
        logo,
        renderer,
        config.pipeline_options(),
    );
    Ok((pipeline, pool))
}

/// First configured profile, or the first that passes the probe when enabled
async fn select_launch_config(config: &Config) -> LaunchConfig {
    let configs = config.browser.launch_configs();
    let fallback = configs
        .first()
        .cloned()
        .unwrap_or_else(|| LaunchConfig::headless(&config.browser.webdriver_url));

    if !config.browser.probe_on_start {
        return fallback;
    }

    let report = probe_launch_configs(&configs, &config.pdf.to_options()).await;
    match report.selected {
        Some(name) => configs
            .into_iter()
            .find(|c| c.name == name)
            .unwrap_or(fallback),
        None => {
            tracing::warn!(
                profile = %fallback.name,
                "no browser launch profile passed the probe, using the first one"
            );
            fallback
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,receipt=debug,receipt_server=debug,pdf_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
