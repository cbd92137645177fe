//! UTXO ledger indexer node.
//!
//! This is the main entry point for the ledger-node binary.

use anyhow::{Context, Result};
use clap::Parser;
use ledger_api::AppState;
use ledger_state::LedgerManager;
use ledger_storage::Database;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::NodeConfig;

/// UTXO ledger indexer: validates submitted blocks, maintains balances,
/// and supports rollback to any prior height.
#[derive(Parser, Debug)]
#[command(name = "ledger-node")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ledger-node.toml")]
    config: PathBuf,

    /// Store data directory (overrides DATABASE_URL)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// API bind address
    #[arg(long)]
    bind: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ledger indexer v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = NodeConfig::load(&args.config, &args)?;
    let store_path = config.store_path()?;

    info!("Store: {:?}", store_path);
    info!("API: {}", config.api.bind_address);

    // Open the store and bootstrap the schema idempotently
    let db = Database::open(store_path).context("Failed to open store")?;
    db.ensure_schema().context("Failed to verify store schema")?;

    let ledger = Arc::new(LedgerManager::new(Arc::new(db)));
    let height = ledger.tip_height()?;
    info!(height, "Ledger state loaded");

    // Build and serve the API
    let app_state = AppState::new(ledger, config.node_name.clone());
    let router = ledger_api::build_api(app_state);

    let listener = tokio::net::TcpListener::bind(&config.api.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.api.bind_address))?;

    info!("Listening on {}", config.api.bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Ledger indexer stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}
