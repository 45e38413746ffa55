//! Sensorlog API Server
//!
//! Run with: cargo run --bin sensorlog-api -- [--config path/to/config.toml]
//!
//! # Configuration
//!
//! Without `--config`, the first of `<config dir>/sensorlog/config.toml`,
//! `/etc/sensorlog/config.toml` and `./config.toml` that exists is used.
//!
//! Environment variables override file settings:
//! - `SENSORLOG_DB_PATH`: SQLite database file
//! - `SENSORLOG_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SENSORLOG_API_PORT`: Port to listen on (default: 5000)
//! - `SENSORLOG_LOG_LEVEL`: Log level (default: info)
//! - `SENSORLOG_LOG_FORMAT`: `pretty` or `json`
//! - `RUST_LOG`: Full tracing filter, takes precedence over the log level

use clap::Parser;
use sensorlog::api::{serve, AppState};
use sensorlog::config::{Config, LoggingConfig};
use sensorlog::storage::ReadingStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sensorlog-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sensor reading API server")]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Sensorlog API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.storage.db_path);

    let store = Arc::new(ReadingStore::open(&config.storage.db_path)?);
    tracing::info!("Reading store ready ({} readings)", store.count()?);

    let state = AppState::new(store, config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("Sensorlog API server stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sensorlog={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
