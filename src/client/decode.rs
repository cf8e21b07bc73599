//! Mapping of API response bodies onto the library's typed model.
//!
//! Unknown property and block kinds are kept as `Unknown`/`Unsupported`
//! rather than rejected.

use notion_issues_lib::BackendError;
use notion_issues_lib::model::{
    ColumnKind, ContentNode, DateValue, Person, PropertyValue, Row, TableSchema,
};
use serde_json::{Map, Value};

type Result<T> = std::result::Result<T, BackendError>;

fn malformed(what: &str) -> BackendError {
    BackendError::new(format!("Malformed response: {what}"))
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn properties_of<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(&format!("{what} has no properties")))
}

/// Concatenate the `plain_text` of every rich-text segment.
#[must_use]
pub fn plain_text(segments: &Value) -> String {
    segments
        .as_array()
        .map(|segments| {
            segments
                .iter()
                .filter_map(|segment| str_field(segment, "plain_text"))
                .collect()
        })
        .unwrap_or_default()
}

/// Column definitions from a database object.
///
/// # Errors
///
/// Returns an error if the body has no `properties` object.
pub fn decode_schema(database: &Value) -> Result<TableSchema> {
    let columns = properties_of(database, "database")?
        .iter()
        .map(|(name, column)| (name.clone(), decode_column_kind(column)))
        .collect();
    Ok(TableSchema { columns })
}

fn decode_column_kind(column: &Value) -> ColumnKind {
    match str_field(column, "type").unwrap_or_default() {
        "title" => ColumnKind::Title,
        "unique_id" => ColumnKind::UniqueId {
            prefix: column
                .pointer("/unique_id/prefix")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        "people" => ColumnKind::People,
        "status" => ColumnKind::Status,
        "select" => ColumnKind::Select,
        "multi_select" => ColumnKind::MultiSelect,
        "date" => ColumnKind::Date,
        "relation" => ColumnKind::Relation,
        other => ColumnKind::Unknown(other.to_string()),
    }
}

/// A page object as a [`Row`].
///
/// # Errors
///
/// Returns an error if the page has no `id` or no `properties`.
pub fn decode_row(page: &Value) -> Result<Row> {
    let id = str_field(page, "id").ok_or_else(|| malformed("page has no id"))?;
    let url = str_field(page, "url").unwrap_or_default();
    let mut row = Row::new(id, url);
    for (name, value) in properties_of(page, "page")? {
        row.properties.insert(name.clone(), decode_property(value));
    }
    Ok(row)
}

/// Rows from a query response.
///
/// # Errors
///
/// Returns an error if `results` is missing or any page is malformed.
pub fn decode_rows(response: &Value) -> Result<Vec<Row>> {
    results(response)?.iter().map(decode_row).collect()
}

fn results(response: &Value) -> Result<&Vec<Value>> {
    response
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing results"))
}

fn name_of(value: &Value) -> Option<String> {
    str_field(value, "name").map(str::to_string)
}

/// One property value of a page.
#[must_use]
pub fn decode_property(property: &Value) -> PropertyValue {
    let kind = str_field(property, "type").unwrap_or_default();
    let body = property.get(kind).unwrap_or(&Value::Null);
    match kind {
        "title" => PropertyValue::Title(plain_text(body)),
        "unique_id" => PropertyValue::UniqueId {
            prefix: str_field(body, "prefix").map(str::to_string),
            number: body.get("number").and_then(Value::as_u64),
        },
        "people" => PropertyValue::People(
            body.as_array()
                .map(|people| {
                    people
                        .iter()
                        .map(|person| {
                            Person::new(
                                str_field(person, "id").unwrap_or_default(),
                                str_field(person, "name").unwrap_or_default(),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default(),
        ),
        "status" => PropertyValue::Status(name_of(body)),
        "select" => PropertyValue::Select(name_of(body)),
        "multi_select" => PropertyValue::MultiSelect(
            body.as_array()
                .map(|options| options.iter().filter_map(name_of).collect())
                .unwrap_or_default(),
        ),
        "date" => PropertyValue::Date(str_field(body, "start").and_then(DateValue::parse)),
        "relation" => PropertyValue::Relation(
            body.as_array()
                .map(|pages| {
                    pages
                        .iter()
                        .filter_map(|page| str_field(page, "id").map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        ),
        other => PropertyValue::Unknown(other.to_string()),
    }
}

/// One block object as a [`ContentNode`].
#[must_use]
pub fn decode_block(block: &Value) -> ContentNode {
    let kind = str_field(block, "type").unwrap_or_default();
    let body = block.get(kind).unwrap_or(&Value::Null);
    let text = || plain_text(body.get("rich_text").unwrap_or(&Value::Null));
    match kind {
        "paragraph" => ContentNode::Paragraph(text()),
        "heading_1" => ContentNode::Heading1(text()),
        "heading_2" => ContentNode::Heading2(text()),
        "heading_3" => ContentNode::Heading3(text()),
        "bulleted_list_item" => ContentNode::BulletedListItem(text()),
        "numbered_list_item" => ContentNode::NumberedListItem(text()),
        "to_do" => ContentNode::ToDo {
            text: text(),
            checked: body.get("checked").and_then(Value::as_bool).unwrap_or(false),
        },
        "toggle" => ContentNode::Toggle(text()),
        "child_page" => ContentNode::ChildPage(str_field(body, "title").unwrap_or_default().to_string()),
        other => ContentNode::Unsupported(other.to_string()),
    }
}

/// Blocks from a children listing.
///
/// # Errors
///
/// Returns an error if `results` is missing.
pub fn decode_children(response: &Value) -> Result<Vec<ContentNode>> {
    Ok(results(response)?.iter().map(decode_block).collect())
}

/// ID of the user the integration acts for.
///
/// A bot resolves to its owning user when it has one.
///
/// # Errors
///
/// Returns an error if the body carries no usable ID.
pub fn decode_current_user(user: &Value) -> Result<String> {
    user.pointer("/bot/owner/user/id")
        .and_then(Value::as_str)
        .or_else(|| str_field(user, "id"))
        .map(str::to_string)
        .ok_or_else(|| malformed("user has no id"))
}
