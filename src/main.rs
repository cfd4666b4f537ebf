//! Legal Lingo API server.
//!
//! This is the application entry point. It loads configuration from an
//! optional TOML file and the environment, initializes tracing, opens the
//! PostgreSQL pool and verifies connectivity, sets up the Axum router, and
//! serves until SIGTERM/SIGINT, closing the pool on the way out.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use legal_lingo_api::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use legal_lingo_api::db::{PgDatabase, PoolIntrospection};
use legal_lingo_api::health::HealthProbe;
use legal_lingo_api::http::{shutdown_signal, start_server};
use legal_lingo_api::routes::create_router;
use legal_lingo_api::state::AppState;
use legal_lingo_api::AppError;

/// Legal Lingo API: backend with a database health endpoint
#[derive(Parser, Debug)]
#[command(name = "legal-lingo-api", version, about)]
struct Args {
    /// Path to a TOML configuration file (environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "legal_lingo_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        "{} v{} starting up...",
        config.app.name,
        config.app.version
    );

    let database = PgDatabase::connect_lazy(&config.database);
    if let Err(e) = database.check_connection().await {
        tracing::error!(error = %e, "Database connection failed");
        return Err(e.into());
    }
    tracing::info!(
        max_connections = config.database.max_connections(),
        "Database connection established"
    );

    if config.app.debug {
        tracing::info!(
            database_url = %config.database.redacted_url(),
            "Debug mode enabled"
        );
    }

    let shared = Arc::new(database.clone());
    let probe = HealthProbe::new(
        &config.app,
        shared.clone(),
        Some(shared as Arc<dyn PoolIntrospection>),
    );

    let http_config = config.http.clone();
    let state = AppState::new(config, probe);
    let app = create_router(state);

    let served = start_server(app, &http_config, shutdown_signal()).await;

    tracing::info!("Shutting down...");
    database.close().await;
    tracing::info!("Database connections closed");

    served.map_err(AppError::from)
}
