//! Markdown rendering of page content and issue documents.

use crate::model::{ContentNode, Issue};

/// Render one content node as a markdown line.
///
/// Numbered items all use `1.` and to-dos are always unchecked; the
/// downstream markdown renderer renumbers lists. Unsupported nodes render
/// as an empty string.
#[must_use]
pub fn render_node(node: &ContentNode) -> String {
    match node {
        ContentNode::Paragraph(text) => text.clone(),
        ContentNode::Heading1(text) => format!("# {text}"),
        ContentNode::Heading2(text) => format!("## {text}"),
        ContentNode::Heading3(text) => format!("### {text}"),
        ContentNode::BulletedListItem(text) => format!("* {text}"),
        ContentNode::NumberedListItem(text) => format!("1. {text}"),
        ContentNode::ToDo { text, .. } => format!("- [ ] {text}"),
        ContentNode::Toggle(text) => format!("::: details\n{text}\n:::"),
        // Only the title is known here, so it doubles as the link target
        ContentNode::ChildPage(text) => format!("[{text}]({text})"),
        ContentNode::Unsupported(_) => String::new(),
    }
}

/// Render a sequence of nodes, one line each.
#[must_use]
pub fn render_content(nodes: &[ContentNode]) -> Vec<String> {
    nodes.iter().map(render_node).collect()
}

/// Assemble the human-readable issue document.
///
/// Layout: a definition list of ID, Title, Assignees and URL, then a
/// `Properties` block (only when there are any), a horizontal rule, and the
/// content lines.
#[must_use]
pub fn render_document(issue: &Issue) -> String {
    let mut doc = String::new();
    doc.push_str(&format!("\nID\n: {}\n\n", issue.id));
    doc.push_str(&format!("Title\n: {}\n\n", issue.title));
    doc.push_str(&format!("Assignees\n: {}\n\n", issue.assignees.join("\n:  ")));
    doc.push_str(&format!("URL\n: {}\n\n", issue.url));

    let meta: String = issue
        .properties
        .iter()
        .filter(|prop| !prop.values.is_empty())
        .map(|prop| format!(": __{}__: {}\n", prop.name, prop.values.join(", ")))
        .collect();
    if !meta.is_empty() {
        doc.push_str("Properties\n");
        doc.push_str(&meta);
    }

    doc.push_str("\n\n---\n\n");
    if let Some(content) = &issue.content {
        doc.push_str(&content.join("\n"));
    }
    doc
}
