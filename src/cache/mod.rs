//! Cache layer for pokedex-sync
//!
//! The cache is read-aside and advisory only: a miss or a failing
//! backend must never change behavior beyond falling through to the
//! database. Backends implement [`CacheStore`].

pub mod memory;

pub use memory::MemoryCache;

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::CacheError;

/// Cache key under which the serialized pokemon listing is stored
pub const ITEMS_CACHE_KEY: &str = "items_cache";

/// Trait for cache backends
///
/// Get, set, and delete are independent operations; callers treat any
/// error as a logged non-fatal condition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieve a cached value by key
    ///
    /// Returns `Ok(None)` on a miss (including an expired entry).
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Store a value with a time-to-live
    ///
    /// Overwrites any existing entry under the same key.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;

    /// Delete a cached value by key
    ///
    /// Succeeds even if the entry does not exist.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
