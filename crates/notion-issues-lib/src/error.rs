//! Error types for `notion-issues-lib`.
//!
//! Every failure of a remote call surfaces as a variant here; deciding
//! whether to terminate is left to the outermost caller.

use thiserror::Error;

use crate::backend::BackendError;

/// Primary error type for notion-issues-lib operations.
#[derive(Error, Debug)]
pub enum IssueDbError {
    // === Schema Errors ===
    /// The database lacks a unique-ID or title column.
    #[error("Database {table_id} does not contain required properties: {}", missing.join(", "))]
    SchemaIncomplete {
        table_id: String,
        missing: Vec<&'static str>,
    },

    // === Issue Errors ===
    /// Issue identifier does not have the `<prefix>-<digits>` shape.
    #[error("Invalid issue ID '{id}': expected {expected}")]
    InvalidIssueIdentifier { id: String, expected: String },

    /// No row matched the issue identifier.
    #[error("Issue not found: {id}")]
    NotFound { id: String },

    /// ID pattern could not be compiled from the database prefix.
    #[error("Invalid ID pattern: {0}")]
    Pattern(#[from] regex::Error),

    // === Remote Errors ===
    /// The database query itself failed.
    #[error("Query failed: {0}")]
    Query(#[source] BackendError),

    /// A non-query fetch (schema, page, children, user) failed.
    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: BackendError,
    },

    /// A related page's title could not be resolved.
    ///
    /// Never returned from public operations; built only to be logged.
    #[error("Related page lookup failed for {row_id}: {source}")]
    RelatedLookupFailed {
        row_id: String,
        #[source]
        source: BackendError,
    },

    /// A row-transform worker died before reporting its issue.
    #[error("Worker processing row {row_id} panicked")]
    WorkerPanicked { row_id: String },

    // === Cache Errors ===
    /// Key-value cache read or write failed.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl IssueDbError {
    #[must_use]
    pub fn fetch(what: impl Into<String>, source: BackendError) -> Self {
        Self::Fetch {
            what: what.into(),
            source,
        }
    }
}

/// Result type using `IssueDbError`.
pub type Result<T> = std::result::Result<T, IssueDbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_incomplete_lists_missing_columns() {
        let err = IssueDbError::SchemaIncomplete {
            table_id: "db1".to_string(),
            missing: vec!["unique_id", "title"],
        };
        assert_eq!(
            err.to_string(),
            "Database db1 does not contain required properties: unique_id, title"
        );
    }

    #[test]
    fn test_remote_errors_carry_backend_message() {
        let err = IssueDbError::Query(BackendError::new("timeout"));
        assert_eq!(err.to_string(), "Query failed: timeout");

        let err = IssueDbError::fetch(
            "current user",
            BackendError::with_status(401, Some("unauthorized".into()), "API token is invalid."),
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch current user: HTTP 401 (unauthorized): API token is invalid."
        );
    }
}
