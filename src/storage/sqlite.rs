//! SQLite link store
//!
//! This module provides a SQLite-based implementation of the LinkStore trait.
//! By default each crawled site gets its own database file, named after the
//! SHA-256 of the site key.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{LinkStore, StoreError, StoreResult};
use crate::storage::LinkRecord;
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// SQLite link store backend
pub struct SqliteLinkStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteLinkStore {
    /// Opens (or creates) a link store at an explicit path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteLinkStore)` - Successfully opened/created database
    /// * `Err(StoreError)` - Failed to open database
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened link store at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens the per-site database inside `directory`
    ///
    /// The directory is created if it does not exist yet.
    pub fn for_site(directory: &Path, site: &str) -> StoreResult<Self> {
        std::fs::create_dir_all(directory)?;
        Self::open(&database_path(directory, site))
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Location of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Poisoned("sqlite connection".to_string()))
    }
}

/// Database file used for a site inside `directory`
pub fn database_path(directory: &Path, site: &str) -> PathBuf {
    let digest = Sha256::digest(site.as_bytes());
    directory.join(format!("{}.db", hex::encode(digest)))
}

impl LinkStore for SqliteLinkStore {
    fn clean(&self, site: &str) -> StoreResult<()> {
        let removed = self
            .conn()?
            .execute("DELETE FROM links WHERE site = ?1", params![site])?;
        tracing::debug!("Removed {} stored links for {}", removed, site);
        Ok(())
    }

    fn has_scan(&self, site: &str) -> StoreResult<bool> {
        let exists: bool = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM links WHERE site = ?1)",
            params![site],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn load_scan(&self, site: &str) -> StoreResult<Vec<LinkRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT link, canonical, meta_robots, status, modified
             FROM links WHERE site = ?1 ORDER BY id",
        )?;

        let records = stmt
            .query_map(params![site], |row| {
                Ok(LinkRecord {
                    link: row.get(0)?,
                    canonical: row.get(1)?,
                    meta_robots: row.get(2)?,
                    status: row.get(3)?,
                    last_modified: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_links(&self, site: &str) -> StoreResult<usize> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM links WHERE site = ?1",
            params![site],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|e| StoreError::Database(e.to_string()))
    }

    fn link_is_scanned(&self, site: &str, link: &str) -> StoreResult<bool> {
        let exists: bool = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM links WHERE site = ?1 AND link = ?2)",
            params![site, link],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn add_link(&self, site: &str, record: &LinkRecord) -> StoreResult<()> {
        self.conn()?.execute(
            "INSERT OR IGNORE INTO links (site, link, modified, meta_robots, canonical, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                site,
                record.link,
                record.last_modified,
                record.meta_robots,
                record.canonical,
                record.status
            ],
        )?;
        Ok(())
    }
}
