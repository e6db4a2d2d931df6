//! SQLite implementation of the Database trait
//!
//! Async access goes through tokio-rusqlite, which runs blocking
//! rusqlite calls on a dedicated connection task.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::error::DbError;
use crate::models::Pokemon;

/// SQLite database implementation
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Create a new SQLite database connection
    ///
    /// Use `:memory:` for an in-memory database or a file path for
    /// persistent storage. The embedded schema is applied on open.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn upsert_pokemon(
        &self,
        id: i64,
        name: &str,
        base_experience: i64,
    ) -> Result<(), DbError> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO pokemon (id, name, base_experience)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        base_experience = excluded.base_experience,
                        updated_at = CURRENT_TIMESTAMP
                    "#,
                    rusqlite::params![id, name, base_experience],
                )?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    async fn list_pokemon(&self) -> Result<Vec<Pokemon>, DbError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, name, base_experience, updated_at
                    FROM pokemon
                    ORDER BY id
                    "#,
                )?;

                let pokemon = stmt
                    .query_map([], |row| {
                        Ok(Pokemon {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            base_experience: row.get(2)?,
                            updated_at: parse_datetime(row.get::<_, Option<String>>(3)?),
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(pokemon)
            })
            .await
            .map_err(DbError::from)
    }
}

/// Parse an SQLite CURRENT_TIMESTAMP string into a UTC datetime
fn parse_datetime(value: Option<String>) -> Option<DateTime<Utc>> {
    value.and_then(|s| {
        NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    })
}
