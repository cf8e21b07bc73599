//! In-memory backend and fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{Backend, BackendError};
use crate::cache::KvCache;
use crate::error::{IssueDbError, Result};
use crate::model::{ColumnKind, ContentNode, IssueDbSpec, PropertyValue, Row, TableSchema};
use crate::query::{Condition, Filter};

/// Backend serving canned data and counting calls.
///
/// Queries evaluate the filter against the registered rows, so tests see
/// the same narrowing a real database would apply.
#[derive(Debug)]
pub struct MockBackend {
    schemas: HashMap<String, TableSchema>,
    rows: HashMap<String, Vec<Row>>,
    pages: HashMap<String, Row>,
    children: HashMap<String, Vec<ContentNode>>,
    current_user: String,
    query_error: Option<BackendError>,
    panicking_page: Option<String>,
    last_query: Mutex<Option<(Option<Filter>, usize)>>,
    schema_calls: AtomicUsize,
    query_calls: AtomicUsize,
    row_calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
            rows: HashMap::new(),
            pages: HashMap::new(),
            children: HashMap::new(),
            current_user: "me-user".to_string(),
            query_error: None,
            panicking_page: None,
            last_query: Mutex::new(None),
            schema_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            row_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_schema(mut self, table_id: &str, schema: TableSchema) -> Self {
        self.schemas.insert(table_id.to_string(), schema);
        self
    }

    pub fn with_rows(mut self, table_id: &str, rows: Vec<Row>) -> Self {
        self.rows.insert(table_id.to_string(), rows);
        self
    }

    /// Register a page reachable through `get_row`.
    pub fn with_page(mut self, row: Row) -> Self {
        self.pages.insert(row.id.clone(), row);
        self
    }

    pub fn with_children(mut self, row_id: &str, nodes: Vec<ContentNode>) -> Self {
        self.children.insert(row_id.to_string(), nodes);
        self
    }

    pub fn failing_queries(mut self, error: BackendError) -> Self {
        self.query_error = Some(error);
        self
    }

    /// Make `get_row` panic for `row_id`, killing the calling worker.
    pub fn panicking_on_page(mut self, row_id: &str) -> Self {
        self.panicking_page = Some(row_id.to_string());
        self
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn row_calls(&self) -> usize {
        self.row_calls.load(Ordering::SeqCst)
    }

    /// Filter and page size of the most recent query.
    pub fn last_query(&self) -> Option<(Option<Filter>, usize)> {
        self.last_query.lock().unwrap().clone()
    }
}

impl Backend for MockBackend {
    fn table_schema(&self, table_id: &str) -> std::result::Result<TableSchema, BackendError> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.schemas
            .get(table_id)
            .cloned()
            .ok_or_else(|| not_found("no such database"))
    }

    fn query_table(
        &self,
        table_id: &str,
        filter: Option<&Filter>,
        page_size: usize,
    ) -> std::result::Result<Vec<Row>, BackendError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some((filter.cloned(), page_size));
        if let Some(error) = &self.query_error {
            return Err(error.clone());
        }
        let rows = self.rows.get(table_id).map_or(&[][..], Vec::as_slice);
        Ok(rows
            .iter()
            .filter(|row| filter.is_none_or(|f| matches(f, row)))
            .take(page_size)
            .cloned()
            .collect())
    }

    fn get_row(&self, row_id: &str) -> std::result::Result<Row, BackendError> {
        self.row_calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking_page.as_deref() == Some(row_id) {
            panic!("page {row_id} exploded");
        }
        self.pages
            .get(row_id)
            .cloned()
            .ok_or_else(|| not_found("no such page"))
    }

    fn children(&self, row_id: &str) -> std::result::Result<Vec<ContentNode>, BackendError> {
        self.children
            .get(row_id)
            .cloned()
            .ok_or_else(|| not_found("no such block"))
    }

    fn current_user(&self) -> std::result::Result<String, BackendError> {
        Ok(self.current_user.clone())
    }
}

fn not_found(message: &str) -> BackendError {
    BackendError::with_status(404, Some("object_not_found".to_string()), message)
}

fn matches(filter: &Filter, row: &Row) -> bool {
    match filter {
        Filter::And(parts) => parts.iter().all(|part| matches(part, row)),
        Filter::Or(parts) => parts.is_empty() || parts.iter().any(|part| matches(part, row)),
        Filter::Property {
            property,
            condition,
        } => {
            let value = row.properties.get(property);
            match (condition, value) {
                (Condition::TextContains(needle), Some(PropertyValue::Title(text))) => {
                    text.to_lowercase().contains(&needle.to_lowercase())
                }
                (Condition::NumberEquals(n), Some(PropertyValue::UniqueId { number, .. })) => {
                    number.and_then(|v| i64::try_from(v).ok()) == Some(*n)
                }
                (Condition::PeopleContains(user), Some(PropertyValue::People(people))) => {
                    people.iter().any(|person| &person.id == user)
                }
                (Condition::StatusNotEquals(status), Some(PropertyValue::Status(value))) => {
                    !value
                        .as_deref()
                        .is_some_and(|v| v.eq_ignore_ascii_case(status))
                }
                (Condition::StatusNotEquals(_), None) => true,
                _ => false,
            }
        }
    }
}

/// Cache whose every operation fails.
#[derive(Debug)]
pub struct FailingCache;

impl KvCache for FailingCache {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(IssueDbError::Cache("read refused".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(IssueDbError::Cache("write refused".to_string()))
    }
}

/// Schema with `ID`, `Name`, `Assignee` and `Status` columns.
pub fn issue_schema(prefix: &str) -> TableSchema {
    TableSchema::new()
        .with_column(
            "ID",
            ColumnKind::UniqueId {
                prefix: Some(prefix.to_string()),
            },
        )
        .with_column("Name", ColumnKind::Title)
        .with_column("Assignee", ColumnKind::People)
        .with_column("Status", ColumnKind::Status)
}

/// What [`issue_schema`] classifies to.
pub fn issue_spec(prefix: &str) -> IssueDbSpec {
    IssueDbSpec {
        id_column: "ID".to_string(),
        id_prefix: prefix.to_string(),
        title_column: "Name".to_string(),
        assignee_column: Some("Assignee".to_string()),
        status_column: Some("Status".to_string()),
    }
}

/// Row with only the ID and title columns filled.
pub fn issue_row(page_id: &str, prefix: &str, number: u64, title: &str) -> Row {
    Row::new(page_id, format!("https://www.notion.so/{page_id}"))
        .with_property(
            "ID",
            PropertyValue::UniqueId {
                prefix: Some(prefix.to_string()),
                number: Some(number),
            },
        )
        .with_property("Name", PropertyValue::Title(title.to_string()))
}
