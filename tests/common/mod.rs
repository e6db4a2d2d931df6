//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pokedex_sync::cache::MemoryCache;
use pokedex_sync::config::{RetryConfig, UpstreamConfig};
use pokedex_sync::database::SqliteDatabase;
use pokedex_sync::server::AppState;
use pokedex_sync::sync::{FetchClient, Syncer};

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Upstream configuration pointing at a mock server, with no backoff waits
pub fn test_upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        page_limit: 20,
        retry: RetryConfig {
            max_attempts: 1,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        },
    }
}

/// Create a test application state against the given upstream base URL
pub async fn create_test_state(base_url: &str) -> AppState<SqliteDatabase, MemoryCache> {
    let database = create_test_database().await;
    let cache = Arc::new(MemoryCache::new());

    let upstream = test_upstream_config(base_url);
    let client = FetchClient::new(&upstream);
    let syncer = Arc::new(Syncer::new(
        client,
        Arc::clone(&database),
        Arc::clone(&cache),
        upstream.page_limit,
    ));

    AppState {
        database,
        cache,
        syncer,
        cache_ttl: Duration::from_secs(60),
    }
}

/// Run a test server in the background and return its address
///
/// The server shuts down when the returned sender is used or dropped.
pub async fn run_test_server(
    state: AppState<SqliteDatabase, MemoryCache>,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = pokedex_sync::server::build_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}
