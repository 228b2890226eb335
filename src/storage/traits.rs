//! Storage traits and error types
//!
//! This module defines the trait interface for link store backends and
//! associated error types.

use crate::storage::LinkRecord;
use thiserror::Error;

/// Errors that can occur during link store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Lock poisoned: {0}")]
    Poisoned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for link store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only store of crawled links, grouped by site
///
/// Every method takes `&self` so a store can be shared behind an `Arc`
/// between the crawl and anything reading progress while it runs.
/// Implementations must allow concurrent reads while writes continue.
pub trait LinkStore: Send + Sync {
    /// Removes every record stored for a site
    fn clean(&self, site: &str) -> StoreResult<()>;

    /// Returns true if the site has at least one stored record
    fn has_scan(&self, site: &str) -> StoreResult<bool>;

    /// Loads every record of a site, in insertion order
    fn load_scan(&self, site: &str) -> StoreResult<Vec<LinkRecord>>;

    /// Counts the records stored for a site
    fn count_links(&self, site: &str) -> StoreResult<usize>;

    /// Returns true if `link` has a record for the site
    fn link_is_scanned(&self, site: &str, link: &str) -> StoreResult<bool>;

    /// Appends a record for a site
    ///
    /// Records are never mutated; adding a link that is already stored is a
    /// no-op.
    fn add_link(&self, site: &str, record: &LinkRecord) -> StoreResult<()>;
}
