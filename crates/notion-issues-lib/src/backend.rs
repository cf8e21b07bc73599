//! Collaborator contract for the remote workspace.
//!
//! The library never talks to the network itself. Everything it needs from
//! Notion goes through [`Backend`], which the binary implements over HTTP and
//! tests implement in memory.

use std::fmt;

use crate::model::{ContentNode, Row, TableSchema};
use crate::query::Filter;

/// Failure reported by a [`Backend`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Machine-readable error code from the response body.
    pub code: Option<String>,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_status(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.code) {
            (Some(status), Some(code)) => write!(f, "HTTP {status} ({code}): {}", self.message),
            (Some(status), None) => write!(f, "HTTP {status}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {}

/// Remote operations the issue pipeline consumes.
///
/// Implementations must be shareable across the row-transform workers, hence
/// the `Send + Sync` bound. Every call is attempted exactly once; retries are
/// not the library's business.
pub trait Backend: Send + Sync {
    /// Column definitions of a database, keyed by column name.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the schema cannot be fetched.
    fn table_schema(&self, table_id: &str) -> Result<TableSchema, BackendError>;

    /// One page of rows matching `filter` (all rows when `None`).
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the query fails.
    fn query_table(
        &self,
        table_id: &str,
        filter: Option<&Filter>,
        page_size: usize,
    ) -> Result<Vec<Row>, BackendError>;

    /// A single row by its page ID.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the page cannot be fetched.
    fn get_row(&self, row_id: &str) -> Result<Row, BackendError>;

    /// Top-level content blocks of a row's page.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the children cannot be fetched.
    fn children(&self, row_id: &str) -> Result<Vec<ContentNode>, BackendError>;

    /// ID of the user the integration acts for.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the user cannot be determined.
    fn current_user(&self) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status_and_code() {
        let err = BackendError::with_status(404, Some("object_not_found".into()), "gone");
        assert_eq!(err.to_string(), "HTTP 404 (object_not_found): gone");

        let err = BackendError::with_status(502, None, "bad gateway");
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");

        assert_eq!(BackendError::new("reset").to_string(), "reset");
    }
}
