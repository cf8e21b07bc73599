//! Show command implementation.

use notion_issues_lib::render::render_document;
use notion_issues_lib::{IssueStore, PageTitleCache};

use super::Runtime;
use crate::cli::ShowArgs;
use crate::error::Result;

/// Execute the show command.
///
/// Prints the issue as JSON, or as a markdown document with
/// `--render-content` (unless `--json` is also given).
///
/// # Errors
///
/// Returns an error if the ID is malformed, the issue does not exist, or a
/// remote call fails.
pub fn execute(args: &ShowArgs, runtime: &Runtime) -> Result<()> {
    let database_id = runtime.settings.require_database_id()?;
    let client = runtime.client()?;
    let cache = runtime.cache();
    let titles = PageTitleCache::new();
    let store = IssueStore::new(&client, cache.as_ref(), &titles);

    let issue = store.get_issue(database_id, &args.id)?;

    if args.render_content && !runtime.output.is_json() {
        print!("{}", render_document(&issue));
        return Ok(());
    }
    runtime.output.json(&issue)
}
