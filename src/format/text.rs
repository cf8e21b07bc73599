//! Plain text (non-ANSI) formatting for terminal output.

use notion_issues_lib::Issue;

/// Comma-separated assignee names.
#[must_use]
pub fn format_assignees(issue: &Issue) -> String {
    issue.assignees.join(", ")
}

/// Format a single-line issue summary.
///
/// Format: `{id} {title} [{assignees}]`
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    format!("{} {} [{}]", issue.id, issue.title, format_assignees(issue))
}
