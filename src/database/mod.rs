//! Database layer for pokedex-sync
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::Pokemon;

/// Database trait for data persistence
///
/// Uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert or update a pokemon record, keyed by id
    ///
    /// An existing record with the same id is replaced; `updated_at`
    /// is refreshed on every write. Idempotent.
    async fn upsert_pokemon(
        &self,
        id: i64,
        name: &str,
        base_experience: i64,
    ) -> Result<(), DbError>;

    /// Return all pokemon records, ordered by id ascending
    async fn list_pokemon(&self) -> Result<Vec<Pokemon>, DbError>;
}
