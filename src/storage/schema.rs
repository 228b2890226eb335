//! Database schema definitions
//!
//! This module contains the SQL schema for the SQLite link store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per stored page, grouped by the crawled site
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site TEXT NOT NULL,
    link TEXT NOT NULL,
    modified TEXT,
    meta_robots TEXT NOT NULL,
    canonical TEXT NOT NULL,
    status INTEGER NOT NULL,
    UNIQUE(site, link)
);

CREATE INDEX IF NOT EXISTS idx_links_site ON links(site);
"#;

/// Initializes the database schema
///
/// This function is idempotent and can be called multiple times safely.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_links_table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='links'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
