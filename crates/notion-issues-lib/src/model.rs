//! Core data types for notion-issues-lib.
//!
//! Two families live here: the raw shapes a [`Backend`](crate::Backend)
//! hands over (schema, rows, content nodes) and the flattened records the
//! library produces ([`IssueDbSpec`], [`Issue`], [`IssueProperty`]).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// Schema
// ============================================================================

/// Declared kind of a database column.
///
/// Classification of columns is driven purely by this kind, never by the
/// column's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Title,
    /// Auto-incrementing identifier, optionally shown with a prefix.
    UniqueId {
        prefix: Option<String>,
    },
    People,
    Status,
    Select,
    MultiSelect,
    Date,
    Relation,
    /// Any kind the library does not interpret, keeping the API's tag.
    Unknown(String),
}

/// Column definitions of a database, ordered by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: BTreeMap<String, ColumnKind>,
}

impl TableSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column insertion.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.insert(name.into(), kind);
        self
    }
}

/// Which columns of a database play the issue roles.
///
/// Resolved once per database and cached as JSON; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDbSpec {
    pub id_column: String,
    /// Prefix shown before the numeric ID (`ISS` in `ISS-42`). May be empty.
    #[serde(default)]
    pub id_prefix: String,
    pub title_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_column: Option<String>,
}

// ============================================================================
// Rows
// ============================================================================

/// A workspace user as it appears in a people column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Person {
    pub id: String,
    pub name: String,
}

impl Person {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Start of a date property, either a calendar day or an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Day(NaiveDate),
    Instant(DateTime<FixedOffset>),
}

impl DateValue {
    /// Parse the API's ISO 8601 date or date-time text.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(Self::Day(day));
        }
        DateTime::parse_from_rfc3339(text).ok().map(Self::Instant)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

/// Typed value of one column in one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Title(String),
    UniqueId {
        prefix: Option<String>,
        number: Option<u64>,
    },
    People(Vec<Person>),
    Status(Option<String>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Date(Option<DateValue>),
    /// Page IDs of related rows.
    Relation(Vec<String>),
    Unknown(String),
}

impl PropertyValue {
    /// Tag of the kind this value belongs to.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Title(_) => "title",
            Self::UniqueId { .. } => "unique_id",
            Self::People(_) => "people",
            Self::Status(_) => "status",
            Self::Select(_) => "select",
            Self::MultiSelect(_) => "multi_select",
            Self::Date(_) => "date",
            Self::Relation(_) => "relation",
            Self::Unknown(tag) => tag,
        }
    }

    /// Single-string rendering for the kinds that have one.
    ///
    /// A unique ID renders as `PREFIX-N` (or just `N` without a prefix).
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Title(text) => Some(text.clone()),
            Self::UniqueId {
                prefix,
                number: Some(number),
            } => Some(match prefix.as_deref() {
                Some(prefix) if !prefix.is_empty() => format!("{prefix}-{number}"),
                _ => number.to_string(),
            }),
            Self::Status(value) | Self::Select(value) => value.clone(),
            Self::Date(value) => value.map(|date| date.to_string()),
            _ => None,
        }
    }
}

/// One database row (a Notion page) as returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub id: String,
    pub url: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Row {
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Text of the first title-kind property, if any.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::Title(text) => Some(text.clone()),
            _ => None,
        })
    }
}

// ============================================================================
// Content
// ============================================================================

/// One top-level block of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Paragraph(String),
    Heading1(String),
    Heading2(String),
    Heading3(String),
    BulletedListItem(String),
    NumberedListItem(String),
    ToDo { text: String, checked: bool },
    Toggle(String),
    /// Link to a child page; carries the page title.
    ChildPage(String),
    /// Anything else, keeping the API's block type tag.
    Unsupported(String),
}

// ============================================================================
// Output
// ============================================================================

/// Flattened issue record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub assignees: Vec<String>,
    pub url: String,
    /// Markdown lines of the page content (detail view only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<IssueProperty>,
}

/// A column not folded into the core issue fields.
///
/// Never constructed with an empty `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueProperty {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub values: Vec<String>,
}
