//! Output formatting for `nissue`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! Diagnostics always go to stderr through `tracing`; only results reach
//! stdout.

mod output;
mod text;

pub use output::{OutputContext, OutputMode};
pub use text::{format_assignees, format_issue_line};
