//! In-memory link store
//!
//! Records live for the lifetime of the process. Reads take a shared lock so
//! progress observers can read while the crawl keeps writing.

use crate::storage::traits::{LinkStore, StoreError, StoreResult};
use crate::storage::LinkRecord;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct SiteLinks {
    records: Vec<LinkRecord>,
    index: HashSet<String>,
}

/// Link store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    sites: RwLock<HashMap<String, SiteLinks>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, SiteLinks>>> {
        self.sites
            .read()
            .map_err(|_| StoreError::Poisoned("memory link store".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, SiteLinks>>> {
        self.sites
            .write()
            .map_err(|_| StoreError::Poisoned("memory link store".to_string()))
    }
}

impl LinkStore for MemoryLinkStore {
    fn clean(&self, site: &str) -> StoreResult<()> {
        self.write()?.remove(site);
        Ok(())
    }

    fn has_scan(&self, site: &str) -> StoreResult<bool> {
        Ok(self.count_links(site)? > 0)
    }

    fn load_scan(&self, site: &str) -> StoreResult<Vec<LinkRecord>> {
        Ok(self
            .read()?
            .get(site)
            .map(|links| links.records.clone())
            .unwrap_or_default())
    }

    fn count_links(&self, site: &str) -> StoreResult<usize> {
        Ok(self
            .read()?
            .get(site)
            .map(|links| links.records.len())
            .unwrap_or(0))
    }

    fn link_is_scanned(&self, site: &str, link: &str) -> StoreResult<bool> {
        Ok(self
            .read()?
            .get(site)
            .map(|links| links.index.contains(link))
            .unwrap_or(false))
    }

    fn add_link(&self, site: &str, record: &LinkRecord) -> StoreResult<()> {
        let mut sites = self.write()?;
        let links = sites.entry(site.to_string()).or_default();

        if links.index.insert(record.link.clone()) {
            links.records.push(record.clone());
        }
        Ok(())
    }
}
