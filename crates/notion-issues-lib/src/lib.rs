//! `notion-issues-lib`: issue tracking on top of a Notion database.
//!
//! Treats a Notion database as an issue tracker: infers which columns hold
//! the issue ID, title, assignees and status, turns free-text searches into
//! database filters, and flattens result pages into [`Issue`] records or a
//! markdown document. Transport is left to the caller through the
//! [`Backend`] trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use notion_issues_lib::{IssueStore, MemoryCache, PageTitleCache, SearchInput};
//! # fn backend() -> Box<dyn notion_issues_lib::Backend> { unimplemented!() }
//!
//! let backend = backend();
//! let cache = MemoryCache::new();
//! let titles = PageTitleCache::new();
//! let store = IssueStore::new(backend.as_ref(), &cache, &titles);
//!
//! // Search open issues mentioning "login"
//! let issues = store
//!     .get_issues("0123456789abcdef0123456789abcdef", &SearchInput::new("login"))
//!     .unwrap();
//!
//! // Fetch one issue with its page content
//! let issue = store.get_issue("0123456789abcdef0123456789abcdef", "ISS-42").unwrap();
//! println!("{}", notion_issues_lib::render::render_document(&issue));
//! ```

pub mod backend;
pub mod cache;
pub mod error;
pub mod model;
pub mod query;
pub mod render;
pub mod schema;
pub mod store;
pub mod transform;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{Backend, BackendError};
pub use cache::{KvCache, MemoryCache, PageTitleCache};
pub use error::{IssueDbError, Result};
pub use model::{Issue, IssueDbSpec, IssueProperty};
pub use query::{Assignee, Filter, FilterBuilder, SearchInput};
pub use schema::SchemaResolver;
pub use store::{IssueStore, sort_issues_by_id};
