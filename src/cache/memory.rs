//! In-memory cache backend
//!
//! A process-local TTL cache behind an async RwLock. Expired entries
//! are dropped lazily on read. A Redis or other shared backend would
//! slot behind the same [`CacheStore`] trait.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::error::CacheError;

/// A stored value with its expiry deadline
#[derive(Debug, Clone)]
struct Entry {
    value: Bytes,
    expires_at: Instant,
}

/// In-memory TTL cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                // Expired: drop lazily and report a miss
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Set then get returns the stored value
    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();

        cache
            .set("key", Bytes::from("value"), Duration::from_secs(60))
            .await
            .unwrap();

        let got = cache.get("key").await.unwrap();
        assert_eq!(got, Some(Bytes::from("value")));
    }

    // Test 2: Get on an unknown key is a miss
    #[tokio::test]
    async fn test_get_miss() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    // Test 3: Entries expire after their TTL
    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::new();

        cache
            .set("key", Bytes::from("value"), Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("key").await.unwrap(), None);
    }

    // Test 4: Delete removes an entry and tolerates missing keys
    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();

        cache
            .set("key", Bytes::from("value"), Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete("key").await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), None);

        // Deleting again is not an error
        cache.delete("key").await.unwrap();
    }

    // Test 5: Set overwrites an existing entry
    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();

        cache
            .set("key", Bytes::from("old"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("key", Bytes::from("new"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("key").await.unwrap(), Some(Bytes::from("new")));
    }
}
