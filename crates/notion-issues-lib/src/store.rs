//! Issue lookups against a Notion database.
//!
//! [`IssueStore`] ties the pieces together: resolve the schema (cached),
//! build a filter, run one query page, and flatten every row on its own
//! worker thread.

use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::backend::Backend;
use crate::cache::{KvCache, PageTitleCache};
use crate::error::{IssueDbError, Result};
use crate::model::{Issue, IssueDbSpec, Row};
use crate::query::{Assignee, Condition, Filter, FilterBuilder, SearchInput};
use crate::render::render_content;
use crate::schema::SchemaResolver;
use crate::transform::RecordTransformer;
use crate::util::{IdPattern, looks_like_issue_id};

/// Rows fetched per query. Larger result sets are truncated.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Issue operations over one backend and its caches.
pub struct IssueStore<'a> {
    backend: &'a dyn Backend,
    cache: &'a dyn KvCache,
    titles: &'a PageTitleCache,
    page_size: usize,
}

impl<'a> IssueStore<'a> {
    #[must_use]
    pub fn new(
        backend: &'a dyn Backend,
        cache: &'a dyn KvCache,
        titles: &'a PageTitleCache,
    ) -> Self {
        Self {
            backend,
            cache,
            titles,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the query page size (clamped to at least 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resolve the column roles of `table_id`, cache first.
    ///
    /// # Errors
    ///
    /// See [`SchemaResolver::resolve`].
    pub fn resolve_spec(&self, table_id: &str) -> Result<IssueDbSpec> {
        SchemaResolver::new(self.backend, self.cache).resolve(table_id)
    }

    /// Run one page of `filter` against `table_id`.
    ///
    /// An empty filter is sent as no filter at all.
    ///
    /// # Errors
    ///
    /// Returns `Query` if the backend query fails.
    pub fn query(&self, table_id: &str, filter: &Filter, page_size: usize) -> Result<Vec<Row>> {
        let start = Instant::now();
        let filter = (!filter.is_empty()).then_some(filter);
        let rows = self
            .backend
            .query_table(table_id, filter, page_size)
            .map_err(IssueDbError::Query)?;
        debug!(table_id, rows = rows.len(), elapsed = ?start.elapsed(), "Query took");
        Ok(rows)
    }

    /// Fetch one issue by its `<prefix>-<digits>` identifier, with content.
    ///
    /// Only the generic shape is checked up front. The database prefix is
    /// known after schema resolution, so on a cold cache an ID with the
    /// wrong prefix (`BUG-1` against an `ISS` database) still costs one
    /// schema fetch before it is rejected, and no query is sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIssueIdentifier` for a malformed ID (before any remote
    /// call when the shape is wrong altogether), `NotFound` when no row
    /// matches, and `Query`/`Fetch` for remote failures.
    pub fn get_issue(&self, table_id: &str, issue_id: &str) -> Result<Issue> {
        let issue_id = issue_id.trim();
        if !looks_like_issue_id(issue_id) {
            return Err(IssueDbError::InvalidIssueIdentifier {
                id: issue_id.to_string(),
                expected: "<prefix>-<digits>".to_string(),
            });
        }

        let spec = self.resolve_spec(table_id)?;
        let number = IdPattern::new(&spec.id_prefix)?.parse(issue_id)?;

        let filter = Filter::property(&spec.id_column, Condition::NumberEquals(number));
        let row = self
            .query(table_id, &filter, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| IssueDbError::NotFound {
                id: issue_id.to_string(),
            })?;

        let mut issue = RecordTransformer::new(&spec, self.backend, self.titles).transform(&row);
        let children = self
            .backend
            .children(&row.id)
            .map_err(|e| IssueDbError::fetch(format!("content of {issue_id}"), e))?;
        issue.content = Some(render_content(&children));

        Ok(issue)
    }

    /// Search issues.
    ///
    /// Results arrive in worker completion order, not query order; use
    /// [`sort_issues_by_id`] when a stable order matters.
    ///
    /// # Errors
    ///
    /// Returns schema, current-user, and query failures.
    pub fn get_issues(&self, table_id: &str, input: &SearchInput) -> Result<Vec<Issue>> {
        let spec = self.resolve_spec(table_id)?;

        let assignee = match &input.assignee {
            Some(Assignee::User(user)) => Some(user.clone()),
            Some(Assignee::Me) => Some(
                self.backend
                    .current_user()
                    .map_err(|e| IssueDbError::fetch("current user", e))?,
            ),
            None => None,
        };

        let start = Instant::now();
        let filter = FilterBuilder::new(&spec)?.build(
            &input.tokens(),
            assignee.as_deref(),
            input.include_closed,
        );
        debug!(elapsed = ?start.elapsed(), "Filter constructed");

        let rows = self.query(table_id, &filter, self.page_size)?;
        self.transform_rows(&spec, &rows)
    }

    /// Flatten `rows` concurrently, one worker per row.
    ///
    /// Blocks until every worker has reported. Output order is completion
    /// order.
    ///
    /// Panics are only recoverable when unwinding. The release profile sets
    /// `panic = "abort"`, so there a worker panic ends the process instead
    /// of yielding `WorkerPanicked`.
    ///
    /// # Errors
    ///
    /// Returns `WorkerPanicked` if any worker died.
    pub fn transform_rows(&self, spec: &IssueDbSpec, rows: &[Row]) -> Result<Vec<Issue>> {
        let start = Instant::now();
        let transformer = RecordTransformer::new(spec, self.backend, self.titles);
        let (tx, rx) = mpsc::channel();

        let issues = thread::scope(|scope| {
            let handles: Vec<_> = rows
                .iter()
                .map(|row| {
                    let tx = tx.clone();
                    let transformer = &transformer;
                    scope.spawn(move || {
                        // Receiver outlives every worker
                        let _ = tx.send(transformer.transform(row));
                    })
                })
                .collect();
            drop(tx);

            let issues: Vec<Issue> = rx.iter().collect();

            // Join every handle so the scope never re-raises a panic
            let mut panicked = None;
            for (handle, row) in handles.into_iter().zip(rows) {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(row.id.clone());
                }
            }
            match panicked {
                Some(row_id) => Err(IssueDbError::WorkerPanicked { row_id }),
                None => Ok(issues),
            }
        })?;

        debug!(issues = issues.len(), elapsed = ?start.elapsed(), "Processing took");
        Ok(issues)
    }
}

/// Sort by numeric ID suffix, then by the full ID text.
///
/// IDs without a numeric suffix sort last.
pub fn sort_issues_by_id(issues: &mut [Issue]) {
    issues.sort_by_cached_key(|issue| {
        let number = issue
            .id
            .rsplit('-')
            .next()
            .and_then(|tail| tail.parse::<u64>().ok());
        (number.is_none(), number, issue.id.clone())
    });
}
