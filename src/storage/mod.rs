//! `SQLite` storage layer for `nissue`.
//!
//! Holds resolved database schemas between runs so that repeated lookups
//! against the same database skip the schema fetch. The cache file is only
//! ever invalidated by deleting it (`nissue maintenance`).

pub mod sqlite;

pub use sqlite::{SqliteCache, remove_cache_file};
