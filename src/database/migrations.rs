//! Embedded schema for the SQLite database
//!
//! The schema is applied with `execute_batch` on startup; every
//! statement is idempotent so re-running it is safe.

/// Schema creation SQL
pub const CREATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pokemon (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    base_experience INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;
