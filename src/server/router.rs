//! HTTP router for pokedex-sync
//!
//! Routes:
//! - `GET /health`: liveness and version
//! - `POST /sync`: drive one synchronization pass synchronously
//! - `GET /items`: cache-aside read of the synchronized records

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

use crate::cache::{CacheStore, ITEMS_CACHE_KEY};
use crate::database::Database;
use crate::sync::Syncer;

/// Shared application state
pub struct AppState<D: Database, C: CacheStore> {
    /// Database
    pub database: Arc<D>,

    /// Cache backend
    pub cache: Arc<C>,

    /// Sync orchestrator, shared with the background refresher
    pub syncer: Arc<Syncer<D, C>>,

    /// TTL applied when the read path repopulates the cache
    pub cache_ttl: Duration,
}

impl<D: Database, C: CacheStore> Clone for AppState<D, C> {
    fn clone(&self) -> Self {
        Self {
            database: Arc::clone(&self.database),
            cache: Arc::clone(&self.cache),
            syncer: Arc::clone(&self.syncer),
            cache_ttl: self.cache_ttl,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Successful sync trigger response
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    pub listed: u64,
    pub upserted: u64,
    pub failed: u64,
}

/// Generic error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the application router
pub fn build_router<D, C>(state: AppState<D, C>) -> Router
where
    D: Database + 'static,
    C: CacheStore + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/sync", post(trigger_sync::<D, C>))
        .route("/items", get(list_items::<D, C>))
        .with_state(state)
}

/// Liveness endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Drive one synchronization pass synchronously
///
/// Fails with 502 only when the listing fetch failed; per-item
/// failures are reported in the counters of a 200 response.
async fn trigger_sync<D, C>(State(state): State<AppState<D, C>>) -> Response
where
    D: Database + 'static,
    C: CacheStore + 'static,
{
    match state.syncer.sync().await {
        Ok(report) => (
            StatusCode::OK,
            Json(SyncResponse {
                message: "Sync completed successfully".to_string(),
                listed: report.listed,
                upserted: report.upserted,
                failed: report.failed,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "On-demand sync failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Failed to sync data from upstream".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Cache-aside read of the synchronized records
///
/// Cache errors only cause a fallthrough to the database; the cache is
/// repopulated from a detached task so the response never waits on it.
async fn list_items<D, C>(State(state): State<AppState<D, C>>) -> Response
where
    D: Database + 'static,
    C: CacheStore + 'static,
{
    match state.cache.get(ITEMS_CACHE_KEY).await {
        Ok(Some(cached)) => {
            return ([(header::CONTENT_TYPE, "application/json")], cached).into_response();
        }
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "Cache read failed, falling back to database");
        }
    }

    let items = match state.database.list_pokemon().await {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "Failed to load pokemon from database");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch items".to_string(),
                }),
            )
                .into_response();
        }
    };

    let payload = match serde_json::to_vec(&items) {
        Ok(payload) => Bytes::from(payload),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Repopulate the cache without blocking the response
    let cache = Arc::clone(&state.cache);
    let cached = payload.clone();
    let ttl = state.cache_ttl;
    tokio::spawn(async move {
        if let Err(e) = cache.set(ITEMS_CACHE_KEY, cached, ttl).await {
            warn!(error = %e, "Failed to repopulate items cache");
        }
    });

    ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
}
