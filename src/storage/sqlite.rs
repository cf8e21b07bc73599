//! `SQLite` key-value cache.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use notion_issues_lib::{IssueDbError, KvCache};
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{AppError, Result};

const CACHE_TABLE_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS cache (key TEXT PRIMARY KEY, value TEXT)";

/// Durable string cache in a single `SQLite` file.
///
/// The connection opens on first use, behind one lock shared by every
/// reader and writer.
#[derive(Debug)]
pub struct SqliteCache {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl SqliteCache {
    /// Create a cache for `path` without touching the file yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| AppError::Config("cache lock poisoned".to_string()))?;
        if guard.is_none() {
            debug!(path = %self.path.display(), "Opening schema cache");
            let conn = Connection::open(&self.path)?;
            conn.execute(CACHE_TABLE_SCHEMA, [])?;
            *guard = Some(conn);
        }
        Ok(guard)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let guard = self.lock()?;
        match guard.as_ref() {
            Some(conn) => Ok(f(conn)?),
            None => Err(AppError::Config("cache connection unavailable".to_string())),
        }
    }

    /// Fetch a cached value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or queried.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM cache WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    /// Insert or replace a cached value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or written.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cache (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )
        })?;
        Ok(())
    }

    /// Number of cached entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or queried.
    pub fn count(&self) -> Result<usize> {
        let count: i64 =
            self.with_conn(|conn| conn.query_row("SELECT count(*) FROM cache", [], |row| row.get(0)))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl KvCache for SqliteCache {
    fn get(&self, key: &str) -> notion_issues_lib::Result<Option<String>> {
        self.read(key)
            .map_err(|e| IssueDbError::Cache(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> notion_issues_lib::Result<()> {
        self.write(key, value)
            .map_err(|e| IssueDbError::Cache(e.to_string()))
    }
}

/// Delete the cache file at `path`.
///
/// Returns `false` when there was nothing to delete.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove_cache_file(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
