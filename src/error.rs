//! Error types for the `nissue` binary.
//!
//! Library failures arrive as [`IssueDbError`] and are wrapped unchanged;
//! everything else here belongs to the outer surfaces (config, cache
//! file, HTTP transport).

use notion_issues_lib::IssueDbError;
use thiserror::Error;

/// Primary error type for `notion_issues` operations.
#[derive(Error, Debug)]
pub enum AppError {
    // === Issue Pipeline Errors ===
    #[error(transparent)]
    Issues(#[from] IssueDbError),

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No integration token in flags, environment, or config file.
    #[error("Missing Notion integration token: set NOTION_INTEGRATION_TOKEN or `token` in the config file")]
    MissingToken,

    /// No database ID in flags, environment, or config file.
    #[error("Missing database ID: pass --db-id or set NOTION_DATABASE_ID")]
    MissingDatabaseId,

    /// One or more `doctor` checks reported an error.
    #[error("{count} check(s) failed")]
    ChecksFailed { count: usize },

    // === Storage Errors ===
    /// `SQLite` cache error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Transport Errors ===
    /// HTTP client could not be built or a request could not be sent.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AppError {
    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingToken => Some("Create an internal integration at https://www.notion.so/my-integrations"),
            Self::MissingDatabaseId => Some("Copy the 32-character ID from the database URL"),
            Self::Issues(IssueDbError::SchemaIncomplete { .. }) => {
                Some("The database needs a title column and a unique ID column")
            }
            _ => None,
        }
    }

    /// Exit code for this error. Every failure exits with 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
