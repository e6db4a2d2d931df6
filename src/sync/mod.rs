//! Data synchronization core
//!
//! This module holds the pipeline that mirrors the upstream catalog
//! into the local store:
//!
//! - [`backoff`]: deterministic exponential backoff policy
//! - [`client`]: fetch-and-decode client with bounded retries over
//!   transient failures
//! - [`syncer`]: one full synchronization pass (list, detail fan-out,
//!   upsert, cache invalidation)
//! - [`refresher`]: background scheduler re-running passes on an
//!   interval with its own retry loop

pub mod backoff;
pub mod client;
pub mod refresher;
pub mod syncer;

pub use backoff::ExponentialBackoff;
pub use client::FetchClient;
pub use refresher::{Refresher, Syncable};
pub use syncer::{SyncReport, Syncer};
