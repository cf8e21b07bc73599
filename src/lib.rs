//! `notion_issues` - Notion database as an issue tracker
//!
//! This crate provides the outer surfaces of the `nissue` CLI tool; the
//! issue pipeline itself lives in `notion-issues-lib`.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`client`] - Notion HTTP API backend
//! - [`storage`] - `SQLite` schema cache
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - Tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod storage;

pub use error::{AppError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
