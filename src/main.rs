//! pokedex-sync - service entry point
//!
//! Wires together configuration, database, cache, fetch client,
//! syncer, background refresher, and the HTTP server, with a shared
//! shutdown broadcast driven by SIGINT.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pokedex_sync::cache::MemoryCache;
use pokedex_sync::config::Config;
use pokedex_sync::database::SqliteDatabase;
use pokedex_sync::server::{AppState, Server};
use pokedex_sync::sync::{FetchClient, Refresher, Syncer};

/// pokedex-sync - background catalog sync with a cache-aside read path
#[derive(Parser, Debug)]
#[command(name = "pokedex-sync")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file; environment variables are used
    /// when omitted
    #[arg(short, long, env = "POKEDEX_SYNC_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate()?;

    init_tracing(&config.logging.level, &config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting pokedex-sync"
    );

    let database = Arc::new(SqliteDatabase::new(&config.database.path).await?);
    info!(path = %config.database.path, "Database initialized");

    let cache = Arc::new(MemoryCache::new());

    let client = FetchClient::new(&config.upstream);
    let syncer = Arc::new(Syncer::new(
        client,
        Arc::clone(&database),
        Arc::clone(&cache),
        config.upstream.page_limit,
    ));

    let state = AppState {
        database,
        cache,
        syncer: Arc::clone(&syncer),
        cache_ttl: config.cache.ttl(),
    };

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let refresher = Refresher::new(syncer, &config.sync);
    let refresher_handle = tokio::spawn(refresher.run(shutdown_tx.subscribe()));

    let server = Server::new(config.server.clone(), state);

    let signal_tx = shutdown_tx.clone();
    let shutdown = async move {
        let _ = signal::ctrl_c().await;
        info!("Shutdown signal received");
        let _ = signal_tx.send(());
    };

    server.run(shutdown).await?;

    // Make sure the refresher stops even if the signal path was skipped
    let _ = shutdown_tx.send(());
    let _ = refresher_handle.await;

    info!("pokedex-sync stopped");
    Ok(())
}

/// Build the tracing subscriber from the logging configuration
fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    if format == "pretty" {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    }
}
