//! HTTP server components for pokedex-sync
//!
//! Provides the router, request handlers, and server lifecycle
//! management with graceful shutdown.

pub mod router;

pub use router::{build_router, AppState, ErrorResponse, HealthResponse, SyncResponse};

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::cache::CacheStore;
use crate::config::ServerConfig;
use crate::database::Database;

/// HTTP server for pokedex-sync
///
/// Owns bind/serve lifecycle around the axum router.
pub struct Server<D: Database + 'static, C: CacheStore + 'static> {
    config: ServerConfig,
    state: AppState<D, C>,
}

impl<D: Database + 'static, C: CacheStore + 'static> Server<D, C> {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState<D, C>) -> Self {
        Self { config, state }
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        )
    }

    /// Run the server until the shutdown future resolves
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_addr();
        let app = build_router(self.state).layer(tower_http::trace::TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    /// Failed to serve requests
    #[error("Server error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockCacheStore;
    use crate::config::UpstreamConfig;
    use crate::database::MockDatabase;
    use crate::sync::{FetchClient, Syncer};
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_state() -> AppState<MockDatabase, MockCacheStore> {
        let database = Arc::new(MockDatabase::new());
        let cache = Arc::new(MockCacheStore::new());
        let client = FetchClient::new(&UpstreamConfig::default());
        let syncer = Arc::new(Syncer::new(
            client,
            Arc::clone(&database),
            Arc::clone(&cache),
            20,
        ));

        AppState {
            database,
            cache,
            syncer,
            cache_ttl: Duration::from_secs(300),
        }
    }

    // Test 1: Server can be created with config
    #[test]
    fn test_server_new() {
        let config = ServerConfig::default();
        let state = create_test_state();
        let server = Server::new(config, state);
        assert_eq!(server.bind_addr().port(), 8080);
    }

    // Test 2: Server bind address calculation
    #[test]
    fn test_server_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9090,
        };
        let state = create_test_state();
        let server = Server::new(config, state);
        assert_eq!(server.bind_addr().to_string(), "127.0.0.1:9090");
    }

    // Test 3: Server graceful shutdown
    #[tokio::test]
    async fn test_server_graceful_shutdown() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let OS assign a port
        };
        let state = create_test_state();
        let server = Server::new(config, state);

        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        };

        let handle = tokio::spawn(async move { server.run(shutdown).await });

        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    // Test 4: ServerError display messages
    #[test]
    fn test_server_error_display() {
        let bind_err = ServerError::Bind("address in use".to_string());
        assert_eq!(
            bind_err.to_string(),
            "Failed to bind to address: address in use"
        );

        let serve_err = ServerError::Serve("connection reset".to_string());
        assert_eq!(serve_err.to_string(), "Server error: connection reset");
    }
}
