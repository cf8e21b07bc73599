//! Schema resolution: which columns hold the issue ID, title, assignees and
//! status.
//!
//! Resolution is cache-first. A cached spec is trusted as-is; only a miss
//! (or an unreadable entry) costs a schema fetch.

use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::cache::KvCache;
use crate::error::{IssueDbError, Result};
use crate::model::{ColumnKind, IssueDbSpec, TableSchema};

/// Resolves [`IssueDbSpec`]s through a [`KvCache`].
pub struct SchemaResolver<'a> {
    backend: &'a dyn Backend,
    cache: &'a dyn KvCache,
}

impl<'a> SchemaResolver<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn Backend, cache: &'a dyn KvCache) -> Self {
        Self { backend, cache }
    }

    /// Resolve the column roles of `table_id`.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` if the schema cannot be fetched, or `SchemaIncomplete`
    /// if the database has no unique-ID or title column. Nothing is cached in
    /// either case.
    pub fn resolve(&self, table_id: &str) -> Result<IssueDbSpec> {
        let start = Instant::now();

        if let Some(spec) = self.cached(table_id) {
            debug!(table_id, "Schema cache hit");
            return Ok(spec);
        }

        let schema = self
            .backend
            .table_schema(table_id)
            .map_err(|e| IssueDbError::fetch(format!("schema of database {table_id}"), e))?;
        let spec = classify(table_id, &schema)?;

        match serde_json::to_string(&spec) {
            Ok(text) => {
                if let Err(e) = self.cache.set(table_id, &text) {
                    warn!(table_id, error = %e, "Failed to cache database schema");
                }
            }
            Err(e) => warn!(table_id, error = %e, "Failed to serialize database schema"),
        }

        debug!(table_id, elapsed = ?start.elapsed(), "Resolved database schema");
        Ok(spec)
    }

    fn cached(&self, table_id: &str) -> Option<IssueDbSpec> {
        let text = match self.cache.get(table_id) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                debug!(table_id, error = %e, "Schema cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(spec) => Some(spec),
            Err(e) => {
                debug!(table_id, error = %e, "Cached schema unreadable; treating as miss");
                None
            }
        }
    }
}

/// Classify columns by declared kind.
///
/// Columns are visited in name order and the first column of each kind wins,
/// so duplicate kinds resolve the same way on every run.
///
/// # Errors
///
/// Returns `SchemaIncomplete` if no unique-ID or no title column exists.
pub fn classify(table_id: &str, schema: &TableSchema) -> Result<IssueDbSpec> {
    let mut id: Option<(&str, &str)> = None;
    let mut title: Option<&str> = None;
    let mut assignee: Option<&str> = None;
    let mut status: Option<&str> = None;

    for (name, kind) in &schema.columns {
        match kind {
            ColumnKind::UniqueId { prefix } if id.is_none() => {
                id = Some((name.as_str(), prefix.as_deref().unwrap_or_default()));
            }
            ColumnKind::Title if title.is_none() => title = Some(name.as_str()),
            ColumnKind::People if assignee.is_none() => assignee = Some(name.as_str()),
            ColumnKind::Status if status.is_none() => status = Some(name.as_str()),
            _ => {}
        }
    }

    let mut missing = Vec::new();
    if id.is_none() {
        missing.push("unique_id");
    }
    if title.is_none() {
        missing.push("title");
    }

    match (id, title) {
        (Some((id_column, id_prefix)), Some(title_column)) => Ok(IssueDbSpec {
            id_column: id_column.to_string(),
            id_prefix: id_prefix.to_string(),
            title_column: title_column.to_string(),
            assignee_column: assignee.map(str::to_string),
            status_column: status.map(str::to_string),
        }),
        _ => Err(IssueDbError::SchemaIncomplete {
            table_id: table_id.to_string(),
            missing,
        }),
    }
}
