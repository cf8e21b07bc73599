//! Caches used by the issue pipeline.
//!
//! - [`KvCache`]: durable string store for resolved schemas, implemented by
//!   the binary on SQLite and here in memory.
//! - [`PageTitleCache`]: process-lifetime map from related page ID to title.

use std::collections::HashMap;
use std::sync::Mutex;

use dashmap::DashMap;

use crate::error::{IssueDbError, Result};

/// Key-value store with get/set semantics.
///
/// A missing key is `Ok(None)`; an `Err` means the store itself failed.
/// Callers in this crate treat read errors as misses and write errors as
/// warnings.
pub trait KvCache: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `Cache` if the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `Cache` if the underlying store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory [`KvCache`], lost at process exit.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| IssueDbError::Cache("memory cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| IssueDbError::Cache("memory cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Titles of related pages, keyed by page ID.
///
/// Unbounded and never invalidated: a title renamed remotely stays stale
/// until the process exits. Safe to share between worker threads.
#[derive(Debug, Default)]
pub struct PageTitleCache {
    titles: DashMap<String, String>,
}

impl PageTitleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, page_id: &str) -> Option<String> {
        self.titles.get(page_id).map(|entry| entry.value().clone())
    }

    /// Store a title unless one is already present; returns the stored title.
    pub fn insert(&self, page_id: &str, title: String) -> String {
        self.titles
            .entry(page_id.to_string())
            .or_insert(title)
            .value()
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
