//! Row → [`Issue`] flattening.

use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::cache::PageTitleCache;
use crate::error::IssueDbError;
use crate::model::{Issue, IssueDbSpec, IssueProperty, PropertyValue, Row};

/// Converts query rows into [`Issue`]s for one database.
///
/// Shared by reference across worker threads; the only mutable state it
/// touches is the [`PageTitleCache`].
pub struct RecordTransformer<'a> {
    spec: &'a IssueDbSpec,
    backend: &'a dyn Backend,
    titles: &'a PageTitleCache,
}

impl<'a> RecordTransformer<'a> {
    #[must_use]
    pub fn new(spec: &'a IssueDbSpec, backend: &'a dyn Backend, titles: &'a PageTitleCache) -> Self {
        Self {
            spec,
            backend,
            titles,
        }
    }

    /// Flatten `row` into an [`Issue`] without content.
    ///
    /// Properties come out in column-name order; a property with no values
    /// is dropped.
    #[must_use]
    pub fn transform(&self, row: &Row) -> Issue {
        let start = Instant::now();

        let id = row
            .properties
            .get(&self.spec.id_column)
            .and_then(PropertyValue::as_text)
            .unwrap_or_default();
        let title = row
            .properties
            .get(&self.spec.title_column)
            .and_then(PropertyValue::as_text)
            .unwrap_or_default();
        let assignees = self
            .spec
            .assignee_column
            .as_ref()
            .and_then(|column| row.properties.get(column))
            .map(people_names)
            .unwrap_or_default();

        let properties = row
            .properties
            .iter()
            .filter_map(|(name, value)| {
                let values = self.flatten(name, value);
                (!values.is_empty()).then(|| IssueProperty {
                    kind: value.kind().to_string(),
                    name: name.clone(),
                    values,
                })
            })
            .collect();

        let issue = Issue {
            id,
            title,
            assignees,
            url: row.url.clone(),
            content: None,
            properties,
        };
        debug!(issue = %issue.id, elapsed = ?start.elapsed(), "Processed row");
        issue
    }

    fn flatten(&self, name: &str, value: &PropertyValue) -> Vec<String> {
        match value {
            PropertyValue::Select(_) | PropertyValue::Date(_) => value
                .as_text()
                .filter(|text| !text.is_empty())
                .into_iter()
                .collect(),
            PropertyValue::MultiSelect(options) => options.clone(),
            PropertyValue::People(_) => people_names(value),
            PropertyValue::Relation(page_ids) => page_ids
                .iter()
                .filter_map(|page_id| self.related_title(page_id))
                .collect(),
            PropertyValue::Title(_) | PropertyValue::UniqueId { .. } | PropertyValue::Status(_) => {
                Vec::new()
            }
            PropertyValue::Unknown(kind) => {
                debug!(property = name, kind = %kind, "Skipping property of unknown kind");
                Vec::new()
            }
        }
    }

    /// Title of a related page, fetched once per process.
    fn related_title(&self, page_id: &str) -> Option<String> {
        if let Some(title) = self.titles.get(page_id) {
            return Some(title);
        }

        match self.backend.get_row(page_id) {
            Ok(row) => match row.title() {
                Some(title) => Some(self.titles.insert(page_id, title)),
                None => {
                    debug!(page_id, "Related page has no title");
                    None
                }
            },
            Err(source) => {
                let err = IssueDbError::RelatedLookupFailed {
                    row_id: page_id.to_string(),
                    source,
                };
                warn!(error = %err, "Dropping related page from properties");
                None
            }
        }
    }
}

fn people_names(value: &PropertyValue) -> Vec<String> {
    match value {
        PropertyValue::People(people) => people.iter().map(|person| person.name.clone()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateValue, Person};
    use crate::test_support::{MockBackend, issue_row, issue_spec};

    #[test]
    fn test_core_fields() {
        let spec = issue_spec("ISS");
        let backend = MockBackend::new();
        let titles = PageTitleCache::new();
        let transformer = RecordTransformer::new(&spec, &backend, &titles);

        let row = issue_row("p1", "ISS", 12, "Login broken").with_property(
            "Assignee",
            PropertyValue::People(vec![Person::new("u1", "Ada"), Person::new("u2", "Linus")]),
        );
        let issue = transformer.transform(&row);

        assert_eq!(issue.id, "ISS-12");
        assert_eq!(issue.title, "Login broken");
        assert_eq!(issue.assignees, vec!["Ada", "Linus"]);
        assert_eq!(issue.url, "https://www.notion.so/p1");
        assert_eq!(issue.content, None);
    }

    #[test]
    fn test_multi_select_keeps_order_and_empty_select_is_dropped() {
        let spec = issue_spec("ISS");
        let backend = MockBackend::new();
        let titles = PageTitleCache::new();
        let transformer = RecordTransformer::new(&spec, &backend, &titles);

        let row = issue_row("p1", "ISS", 1, "t")
            .with_property(
                "Labels",
                PropertyValue::MultiSelect(vec!["Label B".into(), "Label A".into()]),
            )
            .with_property("Priority", PropertyValue::Select(None))
            .with_property("Team", PropertyValue::Select(Some(String::new())));
        let issue = transformer.transform(&row);

        assert_eq!(
            issue.properties,
            vec![IssueProperty {
                kind: "multi_select".into(),
                name: "Labels".into(),
                values: vec!["Label B".into(), "Label A".into()],
            }]
        );
    }

    #[test]
    fn test_core_kinds_are_suppressed() {
        let spec = issue_spec("ISS");
        let backend = MockBackend::new();
        let titles = PageTitleCache::new();
        let transformer = RecordTransformer::new(&spec, &backend, &titles);

        let row = issue_row("p1", "ISS", 1, "t")
            .with_property("Status", PropertyValue::Status(Some("In progress".into())))
            .with_property("Formula", PropertyValue::Unknown("formula".into()));
        let issue = transformer.transform(&row);
        assert!(issue.properties.is_empty());
    }

    #[test]
    fn test_select_people_and_date_properties() {
        let spec = issue_spec("ISS");
        let backend = MockBackend::new();
        let titles = PageTitleCache::new();
        let transformer = RecordTransformer::new(&spec, &backend, &titles);

        let row = issue_row("p1", "ISS", 1, "t")
            .with_property("Due", PropertyValue::Date(DateValue::parse("2024-05-06")))
            .with_property("Empty date", PropertyValue::Date(None))
            .with_property("Priority", PropertyValue::Select(Some("High".into())))
            .with_property("Reviewers", PropertyValue::People(vec![Person::new("u3", "Grace")]));
        let issue = transformer.transform(&row);

        let summary: Vec<(&str, &str, Vec<&str>)> = issue
            .properties
            .iter()
            .map(|p| {
                (
                    p.kind.as_str(),
                    p.name.as_str(),
                    p.values.iter().map(String::as_str).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("date", "Due", vec!["2024-05-06"]),
                ("select", "Priority", vec!["High"]),
                ("people", "Reviewers", vec!["Grace"]),
            ]
        );
    }

    #[test]
    fn test_relation_titles_are_cached() {
        let spec = issue_spec("ISS");
        let backend = MockBackend::new().with_page(
            Row::new("rel-1", "u").with_property("Name", PropertyValue::Title("Epic".into())),
        );
        let titles = PageTitleCache::new();
        let transformer = RecordTransformer::new(&spec, &backend, &titles);

        let row = issue_row("p1", "ISS", 1, "t")
            .with_property("Epic", PropertyValue::Relation(vec!["rel-1".into()]));
        let first = transformer.transform(&row);
        let second = transformer.transform(&row);

        assert_eq!(first.properties[0].values, vec!["Epic"]);
        assert_eq!(first, second);
        assert_eq!(backend.row_calls(), 1);
        assert_eq!(titles.get("rel-1").as_deref(), Some("Epic"));
    }

    #[test]
    fn test_failed_relation_lookup_yields_no_value() {
        let spec = issue_spec("ISS");
        let backend = MockBackend::new().with_page(
            Row::new("rel-ok", "u").with_property("Name", PropertyValue::Title("Found".into())),
        );
        let titles = PageTitleCache::new();
        let transformer = RecordTransformer::new(&spec, &backend, &titles);

        let row = issue_row("p1", "ISS", 1, "t").with_property(
            "Related",
            PropertyValue::Relation(vec!["rel-missing".into(), "rel-ok".into()]),
        );
        let issue = transformer.transform(&row);
        assert_eq!(issue.properties[0].values, vec!["Found"]);

        let only_missing = issue_row("p2", "ISS", 2, "t")
            .with_property("Related", PropertyValue::Relation(vec!["rel-missing".into()]));
        assert!(transformer.transform(&only_missing).properties.is_empty());
        assert!(titles.get("rel-missing").is_none());
    }
}
