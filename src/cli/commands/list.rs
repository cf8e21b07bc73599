//! List command implementation.
//!
//! Searches the configured database and prints one line per issue, or the
//! issues as a JSON array.

use notion_issues_lib::{
    Assignee, Issue, IssueStore, PageTitleCache, SearchInput, sort_issues_by_id,
};
use tracing::info;

use super::Runtime;
use crate::cli::ListArgs;
use crate::error::Result;
use crate::format::format_issue_line;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the search fails.
pub fn execute(args: &ListArgs, runtime: &Runtime) -> Result<()> {
    let database_id = runtime.settings.require_database_id()?;
    let client = runtime.client()?;
    let cache = runtime.cache();
    let titles = PageTitleCache::new();
    let store = IssueStore::new(&client, cache.as_ref(), &titles)
        .with_page_size(runtime.settings.page_size);

    let input = build_search(args);
    let mut issues = store.get_issues(database_id, &input)?;
    info!(count = issues.len(), "Fetched issues");

    if args.sort {
        sort_issues_by_id(&mut issues);
    }
    print_issues(&issues, runtime)
}

/// Convert CLI args to search criteria.
fn build_search(args: &ListArgs) -> SearchInput {
    let input = SearchInput::new(args.search.join(" ")).include_closed(args.include_closed);
    match args.owner.as_deref().and_then(Assignee::parse) {
        Some(assignee) => input.assigned_to(assignee),
        None => input,
    }
}

fn print_issues(issues: &[Issue], runtime: &Runtime) -> Result<()> {
    let output = &runtime.output;
    if output.is_json() {
        return output.json(&issues);
    }
    if issues.is_empty() {
        output.line("No issues found.");
        return Ok(());
    }
    for issue in issues {
        output.line(&format_issue_line(issue));
    }
    output.line(&format!("\n{} issue(s)", issues.len()));
    Ok(())
}
