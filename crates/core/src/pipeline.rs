//! In-memory evaluation of a [`ListQuery`].
//!
//! Stage order matches the SQL backend: active flag, default order by name,
//! name search, explicit sort, filters, pagination. Text ordering is
//! case-insensitive, absent values sort last in either direction, and ties
//! break on `id` in the sort direction.

use std::cmp::Ordering;

use crate::fields::{FieldValue, Queryable};
use crate::pagination::{Page, PageRequest};
use crate::query::{FilterOperator, FilterSpec, FilterValue, ListQuery, SortDirection, SortSpec};

/// Run the whole pipeline over `items`.
pub fn execute<T: Queryable>(items: impl IntoIterator<Item = T>, query: &ListQuery) -> Page<T> {
    let mut rows: Vec<T> = items
        .into_iter()
        .filter(|item| item.is_active() == query.is_active)
        .collect();
    apply_default_order(&mut rows);

    let mut rows = apply_search(rows, query.search.as_deref());
    apply_sorting(&mut rows, query.sort.as_ref());
    let rows = apply_filters(rows, &query.filters);
    paginate(rows, query.page)
}

/// Keep items whose name contains `search`, ignoring case.
pub fn apply_search<T: Queryable>(items: Vec<T>, search: Option<&str>) -> Vec<T> {
    let Some(needle) = search.map(str::to_lowercase) else {
        return items;
    };
    items
        .into_iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect()
}

/// Order by name (case-insensitive), then id.
pub fn apply_default_order<T: Queryable>(items: &mut [T]) {
    items.sort_by(|a, b| {
        compare_text(a.name(), b.name()).then_with(|| a.id().cmp(&b.id()))
    });
}

/// Order by `sort`; `None` leaves the current order untouched.
pub fn apply_sorting<T: Queryable>(items: &mut [T], sort: Option<&SortSpec>) {
    let Some(sort) = sort else {
        return;
    };
    let field = sort.field.name;
    items.sort_by(|a, b| {
        let ordering = match (a.field_value(field), b.field_value(field)) {
            (Some(va), Some(vb)) => compare_nulls_last(&va, &vb, sort.direction),
            _ => Ordering::Equal,
        };
        ordering.then_with(|| directed(a.id().cmp(&b.id()), sort.direction))
    });
}

/// Keep items matching every filter.
pub fn apply_filters<T: Queryable>(items: Vec<T>, filters: &[FilterSpec]) -> Vec<T> {
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| filters.iter().all(|f| matches_filter(item, f)))
        .collect()
}

/// Slice out the requested page and compute totals.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = items.len() as i64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.page_size()).unwrap_or(0);
    let page_items = items.into_iter().skip(offset).take(take).collect();
    Page::new(page_items, request, total_count)
}

/// Whether `item` satisfies `filter`. Absent values never match.
pub fn matches_filter<T: Queryable>(item: &T, filter: &FilterSpec) -> bool {
    let Some(actual) = item.field_value(filter.field.name) else {
        return false;
    };
    match (actual, &filter.value) {
        (FieldValue::Text(Some(a)), FilterValue::Text(e)) => text_matches(a, filter.operator, e),
        (FieldValue::Integer(a), FilterValue::Integer(e)) => ordered_matches(a.cmp(e), filter.operator),
        (FieldValue::Timestamp(a), FilterValue::Timestamp(e)) => {
            ordered_matches(a.cmp(e), filter.operator)
        }
        (FieldValue::Boolean(a), FilterValue::Boolean(e)) => ordered_matches(a.cmp(e), filter.operator),
        _ => false,
    }
}

fn text_matches(actual: &str, operator: FilterOperator, expected: &str) -> bool {
    match operator {
        FilterOperator::Eq => actual == expected,
        FilterOperator::NotEq => actual != expected,
        FilterOperator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
        FilterOperator::StartsWith => actual.to_lowercase().starts_with(&expected.to_lowercase()),
        FilterOperator::EndsWith => actual.to_lowercase().ends_with(&expected.to_lowercase()),
        _ => false,
    }
}

fn ordered_matches(ordering: Ordering, operator: FilterOperator) -> bool {
    match operator {
        FilterOperator::Eq => ordering == Ordering::Equal,
        FilterOperator::NotEq => ordering != Ordering::Equal,
        FilterOperator::Gt => ordering == Ordering::Greater,
        FilterOperator::Gte => ordering != Ordering::Less,
        FilterOperator::Lt => ordering == Ordering::Less,
        FilterOperator::Lte => ordering != Ordering::Greater,
        _ => false,
    }
}

fn compare_nulls_last(a: &FieldValue<'_>, b: &FieldValue<'_>, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => directed(compare_present(a, b), direction),
    }
}

fn compare_present(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
        (FieldValue::Text(Some(x)), FieldValue::Text(Some(y))) => compare_text(x, y),
        (FieldValue::Boolean(x), FieldValue::Boolean(y)) => x.cmp(y),
        (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldDef, FieldKind};
    use crate::query::{FilterRequest, ManagementQuery, SortRequest};
    use crate::types::DbId;

    static FIELDS: &[FieldDef] = &[
        FieldDef::new("id", FieldKind::Integer),
        FieldDef::new("name", FieldKind::Text),
        FieldDef::new("grade", FieldKind::Integer),
        FieldDef::new("note", FieldKind::OptionalText),
        FieldDef::new("is_active", FieldKind::Boolean),
    ];

    #[derive(Debug, Clone)]
    struct Row {
        id: DbId,
        name: String,
        grade: i64,
        note: Option<String>,
        active: bool,
    }

    impl Queryable for Row {
        fn id(&self) -> DbId {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
            match field {
                "id" => Some(FieldValue::Integer(self.id)),
                "name" => Some(FieldValue::Text(Some(&self.name))),
                "grade" => Some(FieldValue::Integer(self.grade)),
                "note" => Some(FieldValue::Text(self.note.as_deref())),
                "is_active" => Some(FieldValue::Boolean(self.active)),
                _ => None,
            }
        }
    }

    fn row(id: DbId, name: &str, grade: i64, note: Option<&str>) -> Row {
        Row {
            id,
            name: name.to_string(),
            grade,
            note: note.map(str::to_string),
            active: true,
        }
    }

    fn trees() -> Vec<Row> {
        vec![
            row(1, "Oak", 3, Some("hard")),
            row(2, "pine", 1, None),
            row(3, "Maple", 2, Some("Hard maple")),
        ]
    }

    fn names(page: &Page<Row>) -> Vec<&str> {
        page.items.iter().map(|r| r.name.as_str()).collect()
    }

    fn run(rows: Vec<Row>, query: ManagementQuery) -> Page<Row> {
        execute(rows, &query.resolve(FIELDS).unwrap())
    }

    #[test]
    fn default_order_is_case_insensitive_by_name() {
        let page = run(trees(), ManagementQuery::default());
        assert_eq!(names(&page), vec!["Maple", "Oak", "pine"]);
    }

    #[test]
    fn search_matches_substring_ignoring_case() {
        let query = ManagementQuery {
            search_query: Some("A".into()),
            ..ManagementQuery::default()
        };
        let page = run(trees(), query);
        assert_eq!(names(&page), vec!["Maple", "Oak"]);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn inactive_rows_are_excluded_unless_requested() {
        let mut rows = trees();
        rows[0].active = false;

        let active = run(rows.clone(), ManagementQuery::default());
        assert_eq!(names(&active), vec!["Maple", "pine"]);

        let inactive = run(
            rows,
            ManagementQuery {
                is_active: false,
                ..ManagementQuery::default()
            },
        );
        assert_eq!(names(&inactive), vec!["Oak"]);
    }

    #[test]
    fn descending_sort_reverses_ascending() {
        let asc = run(
            trees(),
            ManagementQuery {
                sort: Some(SortRequest::asc("name")),
                ..ManagementQuery::default()
            },
        );
        let desc = run(
            trees(),
            ManagementQuery {
                sort: Some(SortRequest::desc("Name")),
                ..ManagementQuery::default()
            },
        );
        let mut reversed = names(&asc);
        reversed.reverse();
        assert_eq!(names(&desc), reversed);
    }

    #[test]
    fn sort_by_integer_field() {
        let page = run(
            trees(),
            ManagementQuery {
                sort: Some(SortRequest::desc("grade")),
                ..ManagementQuery::default()
            },
        );
        assert_eq!(names(&page), vec!["Oak", "Maple", "pine"]);
    }

    #[test]
    fn absent_values_sort_last_in_both_directions() {
        for sort in [SortRequest::asc("note"), SortRequest::desc("note")] {
            let page = run(
                trees(),
                ManagementQuery {
                    sort: Some(sort),
                    ..ManagementQuery::default()
                },
            );
            assert_eq!(page.items.last().unwrap().name, "pine");
        }
    }

    #[test]
    fn ties_break_on_id_in_sort_direction() {
        let rows = vec![row(1, "Ash", 1, None), row(2, "Ash", 1, None), row(3, "Ash", 1, None)];
        let page = run(
            rows,
            ManagementQuery {
                sort: Some(SortRequest::desc("grade")),
                ..ManagementQuery::default()
            },
        );
        let ids: Vec<DbId> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn filters_combine_with_and() {
        let page = run(
            trees(),
            ManagementQuery {
                filters: vec![
                    FilterRequest::new("note", FilterOperator::Contains, "HARD"),
                    FilterRequest::new("grade", FilterOperator::Gte, "3"),
                ],
                ..ManagementQuery::default()
            },
        );
        assert_eq!(names(&page), vec!["Oak"]);
    }

    #[test]
    fn absent_values_never_match_filters() {
        let page = run(
            trees(),
            ManagementQuery {
                filters: vec![FilterRequest::new("note", FilterOperator::NotEq, "hard")],
                ..ManagementQuery::default()
            },
        );
        assert_eq!(names(&page), vec!["Maple"]);
    }

    #[test]
    fn text_equality_is_exact() {
        let page = run(
            trees(),
            ManagementQuery {
                filters: vec![FilterRequest::new("name", FilterOperator::Eq, "oak")],
                ..ManagementQuery::default()
            },
        );
        assert!(page.items.is_empty());
    }

    #[test]
    fn pages_through_twenty_five_rows() {
        let rows: Vec<Row> = (1..=25).map(|i| row(i, &format!("Item {i:02}"), i, None)).collect();
        let sizes: Vec<usize> = (1..=4)
            .map(|page_number| {
                let page = run(
                    rows.clone(),
                    ManagementQuery {
                        page_number,
                        page_size: 10,
                        ..ManagementQuery::default()
                    },
                );
                assert_eq!(page.total_count, 25);
                assert_eq!(page.total_pages, 3);
                page.items.len()
            })
            .collect();
        assert_eq!(sizes, vec![10, 10, 5, 0]);
    }
}
