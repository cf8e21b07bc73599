//! JSON output routing.

use serde::Serialize;

use crate::error::Result;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain text lines
    Text,
    /// Pretty-printed JSON
    Json,
    /// Errors only; results are suppressed
    Quiet,
}

/// Output routing shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    mode: OutputMode,
}

impl OutputContext {
    /// Create from CLI global args. `--json` wins over `--quiet`.
    #[must_use]
    pub const fn from_flags(json: bool, quiet: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.mode == OutputMode::Quiet
    }

    /// Print `value` as pretty JSON regardless of mode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a text line unless quiet.
    pub fn line(&self, text: &str) {
        if !self.is_quiet() {
            println!("{text}");
        }
    }
}
