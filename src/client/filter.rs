//! Filter expressions in the query endpoint's JSON shape.

use notion_issues_lib::query::{Condition, Filter};
use serde_json::{Value, json};

/// Encode `filter` as a compound filter object.
#[must_use]
pub fn encode_filter(filter: &Filter) -> Value {
    match filter {
        Filter::And(parts) => json!({ "and": parts.iter().map(encode_filter).collect::<Vec<_>>() }),
        Filter::Or(parts) => json!({ "or": parts.iter().map(encode_filter).collect::<Vec<_>>() }),
        Filter::Property {
            property,
            condition,
        } => match condition {
            Condition::TextContains(text) => {
                json!({ "property": property, "rich_text": { "contains": text } })
            }
            Condition::NumberEquals(number) => {
                json!({ "property": property, "number": { "equals": number } })
            }
            Condition::PeopleContains(user) => {
                json!({ "property": property, "people": { "contains": user } })
            }
            Condition::StatusNotEquals(status) => {
                json!({ "property": property, "status": { "does_not_equal": status } })
            }
        },
    }
}

/// Request body for one page of results.
#[must_use]
pub fn query_body(filter: Option<&Filter>, page_size: usize) -> Value {
    let mut body = json!({ "page_size": page_size });
    if let Some(filter) = filter {
        body["filter"] = encode_filter(filter);
    }
    body
}
