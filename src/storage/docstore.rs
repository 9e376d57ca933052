//! SQLite document store for scraped shows.
//!
//! Each show is stored as one JSON document keyed by a stable id
//! derived from the page URL, so re-crawling a show replaces its
//! document instead of inserting a duplicate.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{AppError, Result};
use crate::models::Show;
use crate::storage::ShowSink;

/// One row from the document table, without the document body.
#[derive(Debug, Clone)]
pub struct StoredShow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub stored_at: String,
}

/// SQLite-backed document store.
pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Open (or create) the document store at the given path.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS shows (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                url TEXT NOT NULL,
                document TEXT NOT NULL,
                stored_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_shows_name ON shows(name);
        ",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AppError::storage(format!("Failed to lock document store: {e}")))
    }

    /// Insert or replace one show document.
    pub fn upsert(&self, show: &Show) -> Result<()> {
        let document = serde_json::to_string(show)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO shows (id, name, url, document, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 url = excluded.url,
                 document = excluded.document,
                 stored_at = excluded.stored_at",
            params![show.document_id(), show.name, show.url, document, now],
        )?;
        Ok(())
    }

    /// List stored shows ordered by name.
    pub fn list_shows(&self) -> Result<Vec<StoredShow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, url, stored_at FROM shows ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(StoredShow {
                id: row.get(0)?,
                name: row.get(1)?,
                url: row.get(2)?,
                stored_at: row.get(3)?,
            })
        })?;

        let mut shows = Vec::new();
        for row in rows {
            shows.push(row?);
        }
        Ok(shows)
    }

    /// Fetch one show document by name.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Show>> {
        let conn = self.conn()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM shows WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    /// Number of stored shows.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM shows", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl ShowSink for DocumentStore {
    async fn store_show(&self, show: &Show) -> Result<()> {
        self.upsert(show)
    }

    fn name(&self) -> &'static str {
        "document store"
    }

    fn required(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_show(name: &str, url: &str) -> Show {
        Show {
            name: name.to_string(),
            url: url.to_string(),
            status: "Airing".to_string(),
            rating_value: 8.0,
            rating_count: 42,
            ..Show::default()
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let store = DocumentStore::new_in_memory().unwrap();
        let show = sample_show("Example Show", "https://eztv.ag/shows/1-example-show/");

        store.upsert(&show).unwrap();

        let loaded = store.get_by_name("Example Show").unwrap().unwrap();
        assert_eq!(loaded, show);
        assert!(store.get_by_name("Missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_existing_document() {
        let store = DocumentStore::new_in_memory().unwrap();
        let url = "https://eztv.ag/shows/1-example-show/";

        store.upsert(&sample_show("Example Show", url)).unwrap();

        let mut updated = sample_show("Example Show", url);
        updated.status = "Ended".to_string();
        store.upsert(&updated).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let loaded = store.get_by_name("Example Show").unwrap().unwrap();
        assert_eq!(loaded.status, "Ended");
    }

    #[test]
    fn test_list_shows_ordered_by_name() {
        let store = DocumentStore::new_in_memory().unwrap();
        store
            .upsert(&sample_show("Zeta", "https://eztv.ag/shows/2-zeta/"))
            .unwrap();
        store
            .upsert(&sample_show("Alpha", "https://eztv.ag/shows/1-alpha/"))
            .unwrap();

        let shows = store.list_shows().unwrap();
        let names: Vec<_> = shows.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Zeta"]);
    }

    #[test]
    fn test_count_empty_store() {
        let store = DocumentStore::new_in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
