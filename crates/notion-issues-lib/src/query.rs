//! Search input and database filter expressions.

use tracing::debug;

use crate::error::Result;
use crate::model::IssueDbSpec;
use crate::util::{IdPattern, parse_bare_integer};

/// Status value that marks an issue as closed.
pub const CLOSED_STATUS: &str = "done";

/// Leaf condition on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    TextContains(String),
    NumberEquals(i64),
    PeopleContains(String),
    StatusNotEquals(String),
}

/// Boolean filter over database columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Property {
        property: String,
        condition: Condition,
    },
}

impl Filter {
    #[must_use]
    pub fn property(property: impl Into<String>, condition: Condition) -> Self {
        Self::Property {
            property: property.into(),
            condition,
        }
    }

    /// An empty compound matches every row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(parts) | Self::Or(parts) => parts.iter().all(Self::is_empty),
            Self::Property { .. } => false,
        }
    }

    /// All leaf predicates, depth-first.
    #[must_use]
    pub fn leaves(&self) -> Vec<(&str, &Condition)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a Condition)>) {
        match self {
            Self::And(parts) | Self::Or(parts) => {
                for part in parts {
                    part.collect_leaves(out);
                }
            }
            Self::Property {
                property,
                condition,
            } => out.push((property.as_str(), condition)),
        }
    }
}

/// Who an issue listing should be restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
    /// A workspace user ID.
    User(String),
    /// Whoever the integration acts for.
    Me,
}

impl Assignee {
    /// `"me"` (any case) maps to [`Assignee::Me`]; blank input to `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.eq_ignore_ascii_case("me") {
            Some(Self::Me)
        } else {
            Some(Self::User(value.to_string()))
        }
    }
}

/// Criteria for listing issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    /// Free text, split on whitespace into search tokens.
    pub search: String,
    pub assignee: Option<Assignee>,
    pub include_closed: bool,
}

impl SearchInput {
    #[must_use]
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn assigned_to(mut self, assignee: Assignee) -> Self {
        self.assignee = Some(assignee);
        self
    }

    #[must_use]
    pub const fn include_closed(mut self, include_closed: bool) -> Self {
        self.include_closed = include_closed;
        self
    }

    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        self.search.split_whitespace().collect()
    }
}

/// Builds the composite filter for an issue search.
#[derive(Debug)]
pub struct FilterBuilder<'a> {
    spec: &'a IssueDbSpec,
    id_pattern: IdPattern,
}

impl<'a> FilterBuilder<'a> {
    /// # Errors
    ///
    /// Returns `Pattern` if the spec's ID prefix cannot form a pattern.
    pub fn new(spec: &'a IssueDbSpec) -> Result<Self> {
        Ok(Self {
            spec,
            id_pattern: IdPattern::new(&spec.id_prefix)?,
        })
    }

    /// Build `AND(id matches..., assignee, status != done, OR(title contains...))`.
    ///
    /// Every token contributes a title-contains predicate. A token shaped like
    /// `<prefix>-<digits>`, or a bare integer, adds one ID-equals predicate
    /// to the top level. Blank tokens are
    /// skipped. The assignee predicate needs an assignee column and the
    /// closed-status predicate a status column; without them the predicate is
    /// left out.
    #[must_use]
    pub fn build<S: AsRef<str>>(
        &self,
        tokens: &[S],
        assignee: Option<&str>,
        include_closed: bool,
    ) -> Filter {
        let mut all = Vec::new();
        let mut titles = Vec::new();

        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }

            titles.push(Filter::property(
                &self.spec.title_column,
                Condition::TextContains(token.to_string()),
            ));

            // With an empty prefix both rules accept plain digits; emit one predicate
            if let Some(number) = self
                .id_pattern
                .number(token)
                .or_else(|| parse_bare_integer(token))
            {
                all.push(self.id_equals(number));
            }
        }

        if let Some(user) = assignee.map(str::trim).filter(|user| !user.is_empty()) {
            match &self.spec.assignee_column {
                Some(column) => all.push(Filter::property(
                    column,
                    Condition::PeopleContains(user.to_string()),
                )),
                None => debug!("No people column; ignoring assignee filter"),
            }
        }

        if !include_closed {
            match &self.spec.status_column {
                Some(column) => all.push(Filter::property(
                    column,
                    Condition::StatusNotEquals(CLOSED_STATUS.to_string()),
                )),
                None => debug!("No status column; closed issues cannot be excluded"),
            }
        }

        if !titles.is_empty() {
            all.push(Filter::Or(titles));
        }

        Filter::And(all)
    }

    fn id_equals(&self, number: i64) -> Filter {
        Filter::property(&self.spec.id_column, Condition::NumberEquals(number))
    }
}
