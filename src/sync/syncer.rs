//! Sync orchestrator: one full synchronization pass
//!
//! A pass lists the first page of the upstream catalog, fetches each
//! entry's detail, upserts the result, and finally invalidates the
//! cached listing. Per-item failures are logged and skipped; only a
//! failed listing fetch fails the pass. That policy trades
//! completeness of a single pass for availability of the pass as a
//! whole, and is deliberate.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::client::FetchClient;
use super::refresher::Syncable;
use crate::cache::{CacheStore, ITEMS_CACHE_KEY};
use crate::database::Database;
use crate::error::FetchError;

/// Counters for one completed sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries returned by the listing fetch
    pub listed: u64,
    /// Entries successfully upserted
    pub upserted: u64,
    /// Entries skipped due to a detail-fetch or upsert failure
    pub failed: u64,
}

/// Drives one synchronization pass against the upstream catalog
pub struct Syncer<D: Database, C: CacheStore> {
    client: FetchClient,
    database: Arc<D>,
    cache: Arc<C>,
    page_limit: u32,
}

impl<D: Database, C: CacheStore> Syncer<D, C> {
    /// Create a syncer over the given client, store, and cache
    pub fn new(client: FetchClient, database: Arc<D>, cache: Arc<C>, page_limit: u32) -> Self {
        Self {
            client,
            database,
            cache,
            page_limit,
        }
    }

    /// Run one full synchronization pass
    ///
    /// Fails only if the initial listing fetch fails; per-item
    /// failures and a failed cache invalidation are logged and
    /// absorbed here.
    pub async fn sync(&self) -> Result<SyncReport, FetchError> {
        info!(limit = self.page_limit, "Starting sync pass");

        let entries = self
            .client
            .fetch_pokemon_list(self.page_limit)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch pokemon listing");
                e
            })?;

        let mut report = SyncReport {
            listed: entries.len() as u64,
            ..Default::default()
        };

        for entry in &entries {
            let detail = match self.client.fetch_pokemon_detail(&entry.url).await {
                Ok(detail) => detail,
                Err(e) => {
                    error!(
                        name = %entry.name,
                        url = %entry.url,
                        error = %e,
                        "Failed to fetch detail, skipping entry"
                    );
                    report.failed += 1;
                    continue;
                }
            };

            match self
                .database
                .upsert_pokemon(detail.id, &detail.name, detail.base_experience)
                .await
            {
                Ok(()) => report.upserted += 1,
                Err(e) => {
                    error!(id = detail.id, error = %e, "Failed to upsert pokemon");
                    report.failed += 1;
                }
            }
        }

        // The listing cache is stale now regardless of per-item outcomes
        if let Err(e) = self.cache.delete(ITEMS_CACHE_KEY).await {
            warn!(error = %e, "Failed to invalidate items cache");
        }

        info!(
            listed = report.listed,
            upserted = report.upserted,
            failed = report.failed,
            "Sync pass completed"
        );
        Ok(report)
    }
}

#[async_trait]
impl<D: Database, C: CacheStore> Syncable for Syncer<D, C> {
    async fn sync(&self) -> Result<SyncReport, FetchError> {
        Syncer::sync(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockCacheStore;
    use crate::config::{RetryConfig, UpstreamConfig};
    use crate::database::MockDatabase;
    use crate::error::{CacheError, DbError};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> FetchClient {
        FetchClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            page_limit: 20,
            retry: RetryConfig {
                max_attempts: 1,
                initial_backoff_ms: 0,
                max_backoff_ms: 0,
            },
        })
    }

    async fn mount_listing(server: &MockServer, entries: &[(i64, &str)]) {
        let results: Vec<serde_json::Value> = entries
            .iter()
            .map(|(id, name)| {
                serde_json::json!({
                    "name": name,
                    "url": format!("{}/pokemon/{}", server.uri(), id)
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": entries.len(),
                "next": null,
                "previous": null,
                "results": results
            })))
            .mount(server)
            .await;
    }

    async fn mount_detail(server: &MockServer, id: i64, name: &str, base_experience: i64) {
        Mock::given(method("GET"))
            .and(path(format!("/pokemon/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id, "name": name, "base_experience": base_experience
            })))
            .mount(server)
            .await;
    }

    // Test 1: A failed detail fetch skips that entry and only that entry
    #[tokio::test]
    async fn test_partial_detail_failure_skips_entry() {
        let server = MockServer::start().await;
        mount_listing(&server, &[(1, "bulbasaur"), (2, "ivysaur"), (3, "venusaur")]).await;
        mount_detail(&server, 1, "bulbasaur", 64).await;
        // Entry 2 has no mock and yields a 404
        mount_detail(&server, 3, "venusaur", 263).await;

        let mut db = MockDatabase::new();
        db.expect_upsert_pokemon()
            .withf(|id, name, base| *id == 1 && name == "bulbasaur" && *base == 64)
            .times(1)
            .returning(|_, _, _| Ok(()));
        db.expect_upsert_pokemon()
            .withf(|id, name, base| *id == 3 && name == "venusaur" && *base == 263)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut cache = MockCacheStore::new();
        cache
            .expect_delete()
            .withf(|key| key == ITEMS_CACHE_KEY)
            .times(1)
            .returning(|_| Ok(()));

        let syncer = Syncer::new(test_client(&server.uri()), Arc::new(db), Arc::new(cache), 20);
        let report = syncer.sync().await.unwrap();

        assert_eq!(report.listed, 3);
        assert_eq!(report.upserted, 2);
        assert_eq!(report.failed, 1);
    }

    // Test 2: A failed listing fetch aborts the pass with no writes
    #[tokio::test]
    async fn test_listing_failure_fails_pass() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        // No expectations: any upsert or cache call would panic the mock
        let db = MockDatabase::new();
        let cache = MockCacheStore::new();

        let syncer = Syncer::new(test_client(&server.uri()), Arc::new(db), Arc::new(cache), 20);
        let result = syncer.sync().await;

        assert_eq!(result.unwrap_err(), FetchError::Server(500));
    }

    // Test 3: An upsert failure is swallowed at the pass level
    #[tokio::test]
    async fn test_upsert_failure_swallowed() {
        let server = MockServer::start().await;
        mount_listing(&server, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        mount_detail(&server, 1, "bulbasaur", 64).await;
        mount_detail(&server, 2, "ivysaur", 142).await;

        let mut db = MockDatabase::new();
        db.expect_upsert_pokemon()
            .withf(|id, _, _| *id == 1)
            .times(1)
            .returning(|_, _, _| Err(DbError::NotFound));
        db.expect_upsert_pokemon()
            .withf(|id, _, _| *id == 2)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut cache = MockCacheStore::new();
        cache.expect_delete().times(1).returning(|_| Ok(()));

        let syncer = Syncer::new(test_client(&server.uri()), Arc::new(db), Arc::new(cache), 20);
        let report = syncer.sync().await.unwrap();

        assert_eq!(report.upserted, 1);
        assert_eq!(report.failed, 1);
    }

    // Test 4: A cache invalidation failure does not fail the pass
    #[tokio::test]
    async fn test_cache_delete_failure_swallowed() {
        let server = MockServer::start().await;
        mount_listing(&server, &[(1, "bulbasaur")]).await;
        mount_detail(&server, 1, "bulbasaur", 64).await;

        let mut db = MockDatabase::new();
        db.expect_upsert_pokemon()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut cache = MockCacheStore::new();
        cache
            .expect_delete()
            .times(1)
            .returning(|_| Err(CacheError::Backend("redis down".to_string())));

        let syncer = Syncer::new(test_client(&server.uri()), Arc::new(db), Arc::new(cache), 20);
        let report = syncer.sync().await.unwrap();

        assert_eq!(report.upserted, 1);
        assert_eq!(report.failed, 0);
    }

    // Test 5: An empty listing still invalidates the cache
    #[tokio::test]
    async fn test_empty_listing() {
        let server = MockServer::start().await;
        mount_listing(&server, &[]).await;

        let db = MockDatabase::new();
        let mut cache = MockCacheStore::new();
        cache.expect_delete().times(1).returning(|_| Ok(()));

        let syncer = Syncer::new(test_client(&server.uri()), Arc::new(db), Arc::new(cache), 20);
        let report = syncer.sync().await.unwrap();

        assert_eq!(report, SyncReport::default());
    }
}
