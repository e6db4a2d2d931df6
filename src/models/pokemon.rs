//! Pokemon record and upstream wire types
//!
//! [`Pokemon`] is the persisted record. The remaining types mirror the
//! upstream catalog API payloads: a paginated listing of name/url pairs
//! and a per-entry detail document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A synchronized catalog record
///
/// `id` is the stable identity across sync passes; `updated_at` is
/// assigned by the database on every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pokemon {
    /// Upstream-assigned identifier, unique
    pub id: i64,

    /// Display name
    pub name: String,

    /// Base experience value from the upstream detail payload
    pub base_experience: i64,

    /// When this record was last written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of the upstream listing endpoint
///
/// `GET {base}/pokemon?limit=N` response shape. Only the first page is
/// consumed; `next`/`previous` are carried for completeness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingPage {
    /// Total number of entries upstream
    pub count: u64,

    /// URL of the next page, if any
    pub next: Option<String>,

    /// URL of the previous page, if any
    pub previous: Option<String>,

    /// Entries on this page
    pub results: Vec<ListingEntry>,
}

/// A single listing entry: a name and the URL of its detail document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingEntry {
    /// Entry name
    pub name: String,

    /// Absolute URL of the detail payload
    pub url: String,
}

/// The upstream detail payload for one entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PokemonDetail {
    /// Upstream-assigned identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Base experience value
    pub base_experience: i64,
}
