//! Storage module for persisting crawled links
//!
//! This module defines the append-only [`LinkStore`] the crawl engine writes
//! to, and its two backends:
//! - [`MemoryLinkStore`], records kept for the lifetime of the process
//! - [`SqliteLinkStore`], one SQLite database file per crawled site

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryLinkStore;
pub use sqlite::{database_path, SqliteLinkStore};
pub use traits::{LinkStore, StoreError, StoreResult};

use crate::config::{StorageConfig, StoreBackend};
use std::sync::Arc;

/// A page accepted into the sitemap
///
/// Created by the crawl engine after a successful, in-scope, indexable fetch
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub link: String,
    pub canonical: String,
    pub meta_robots: String,
    pub status: u16,
    /// RFC 3339 timestamp taken from the `Last-Modified` header
    pub last_modified: Option<String>,
}

impl LinkRecord {
    /// Creates a record for a page fetched with status 200 and no known
    /// modification time
    pub fn new(link: &str, canonical: &str, meta_robots: &str) -> Self {
        Self {
            link: link.to_string(),
            canonical: canonical.to_string(),
            meta_robots: meta_robots.to_string(),
            status: 200,
            last_modified: None,
        }
    }
}

/// Opens the link store selected by the configuration
///
/// # Arguments
///
/// * `config` - The storage configuration
/// * `site` - Site key, used to name the per-site SQLite database
///
/// # Returns
///
/// * `Ok(Arc<dyn LinkStore>)` - The opened store
/// * `Err(StoreError)` - The SQLite database could not be opened
pub fn open_store(config: &StorageConfig, site: &str) -> StoreResult<Arc<dyn LinkStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryLinkStore::new())),
        StoreBackend::Sqlite => Ok(Arc::new(SqliteLinkStore::for_site(
            &config.directory,
            site,
        )?)),
    }
}
