//! Issue identifier parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IssueDbError, Result};

/// Any `<something>-<digits>` or bare `<digits>` identifier.
static ISSUE_ID_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\S+-)?[0-9]+$").expect("static regex"));

/// Matcher for `<prefix>-<digits>` identifiers of one database.
#[derive(Debug, Clone)]
pub struct IdPattern {
    prefix: String,
    regex: Regex,
}

impl IdPattern {
    /// Build a matcher for `prefix`. An empty prefix matches bare digits.
    ///
    /// # Errors
    ///
    /// Returns `Pattern` if the resulting expression is rejected by the
    /// regex engine (e.g. an absurdly long prefix).
    pub fn new(prefix: &str) -> Result<Self> {
        let source = if prefix.is_empty() {
            "^([0-9]+)$".to_string()
        } else {
            format!("^{}-([0-9]+)$", regex::escape(prefix))
        };
        Ok(Self {
            prefix: prefix.to_string(),
            regex: Regex::new(&source)?,
        })
    }

    /// Numeric part of `token` when it matches the pattern.
    ///
    /// Digit runs too large for an `i64` do not match.
    #[must_use]
    pub fn number(&self, token: &str) -> Option<i64> {
        self.regex
            .captures(token)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    }

    /// Human-readable form of the accepted shape, for error messages.
    #[must_use]
    pub fn expected(&self) -> String {
        if self.prefix.is_empty() {
            "<digits>".to_string()
        } else {
            format!("{}-<digits>", self.prefix)
        }
    }

    /// Parse an issue identifier, rejecting anything off-pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIssueIdentifier` if `id` does not match.
    pub fn parse(&self, id: &str) -> Result<i64> {
        self.number(id)
            .ok_or_else(|| IssueDbError::InvalidIssueIdentifier {
                id: id.to_string(),
                expected: self.expected(),
            })
    }
}

/// Whether `id` could be an issue identifier of any database.
///
/// Used to reject garbage before the prefix is known.
#[must_use]
pub fn looks_like_issue_id(id: &str) -> bool {
    ISSUE_ID_SHAPE.is_match(id)
}

/// Signed decimal integer, optionally with a leading `+`.
#[must_use]
pub fn parse_bare_integer(token: &str) -> Option<i64> {
    token.parse().ok()
}
