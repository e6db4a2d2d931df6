//! pokedex-sync - mirrors the PokeAPI catalog into a local store
//!
//! A background refresher periodically synchronizes the upstream
//! catalog into SQLite; an HTTP surface serves the synchronized data
//! through a cache-aside read path and exposes an on-demand sync
//! trigger.

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod server;
pub mod sync;
