//! The query specification for management listings.
//!
//! A [`ManagementQuery`] is what callers ask for: loosely named sort and filter
//! fields, raw filter values and unvalidated page numbers. Resolving it against
//! an entity's field catalog produces a [`ListQuery`] whose fields, operators
//! and values are all known to be valid, which storage backends then execute
//! (as SQL, or in memory via [`crate::pipeline`]).
//!
//! The query-string wire form (`search`, `page`, `pageSize`, `isActive`,
//! `sortBy`, `sortDir`, `filter[field]`, `filter[field][op]`) is parsed and
//! rendered here so the API and the client cannot drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields::{find_field, FieldDef, FieldKind};
use crate::pagination::{PageRequest, DEFAULT_PAGE_SIZE};
use crate::types::Timestamp;

/// Reasons a query specification is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),

    #[error("Invalid filter on '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid value for parameter '{name}': {value}")]
    InvalidParameter { name: String, value: String },
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(QueryError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// An unresolved sort descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    pub field: String,
    pub direction: SortDirection,
}

impl SortRequest {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A sort descriptor bound to a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static FieldDef,
    pub direction: SortDirection,
}

/// Bind a sort request to `fields`, failing on unknown field names.
pub fn resolve_sort(
    fields: &'static [FieldDef],
    request: &SortRequest,
) -> Result<SortSpec, QueryError> {
    let field = find_field(fields, &request.field)
        .ok_or_else(|| QueryError::InvalidSortField(request.field.clone()))?;
    Ok(SortSpec {
        field,
        direction: request.direction,
    })
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    NotEq,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::NotEq => "ne",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startswith",
            FilterOperator::EndsWith => "endswith",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
        }
    }

    /// Whether this operator can be applied to a field of `kind`.
    pub fn supports(self, kind: FieldKind) -> bool {
        use FilterOperator::*;
        match kind {
            FieldKind::Text | FieldKind::OptionalText => {
                matches!(self, Eq | NotEq | Contains | StartsWith | EndsWith)
            }
            FieldKind::Integer | FieldKind::Timestamp => {
                matches!(self, Eq | NotEq | Gt | Gte | Lt | Lte)
            }
            FieldKind::Boolean => matches!(self, Eq | NotEq),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an operator token; `None` for unknown tokens.
pub fn parse_operator(token: &str) -> Option<FilterOperator> {
    let op = match token.trim().to_ascii_lowercase().as_str() {
        "eq" => FilterOperator::Eq,
        "ne" | "neq" => FilterOperator::NotEq,
        "contains" => FilterOperator::Contains,
        "startswith" | "starts_with" => FilterOperator::StartsWith,
        "endswith" | "ends_with" => FilterOperator::EndsWith,
        "gt" => FilterOperator::Gt,
        "gte" | "ge" => FilterOperator::Gte,
        "lt" => FilterOperator::Lt,
        "lte" | "le" => FilterOperator::Lte,
        _ => return None,
    };
    Some(op)
}

/// An unresolved `(field, operator, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterRequest {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A filter value parsed for its field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Timestamp(Timestamp),
}

/// A filter bound to a catalog field with a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub field: &'static FieldDef,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// Bind every filter request to `fields`.
///
/// Fails on the first unknown field, unsupported operator for the field's
/// kind, or value that does not parse as that kind.
pub fn resolve_filters(
    fields: &'static [FieldDef],
    requests: &[FilterRequest],
) -> Result<Vec<FilterSpec>, QueryError> {
    requests
        .iter()
        .map(|request| resolve_filter(fields, request))
        .collect()
}

fn resolve_filter(
    fields: &'static [FieldDef],
    request: &FilterRequest,
) -> Result<FilterSpec, QueryError> {
    let invalid = |reason: String| QueryError::InvalidFilter {
        field: request.field.clone(),
        reason,
    };

    let field = find_field(fields, &request.field).ok_or_else(|| invalid("unknown field".into()))?;

    if !request.operator.supports(field.kind) {
        return Err(invalid(format!(
            "operator '{}' is not supported on {} fields",
            request.operator,
            field.kind.label()
        )));
    }

    let value = parse_filter_value(field.kind, &request.value).map_err(invalid)?;

    Ok(FilterSpec {
        field,
        operator: request.operator,
        value,
    })
}

fn parse_filter_value(kind: FieldKind, raw: &str) -> Result<FilterValue, String> {
    match kind {
        FieldKind::Text | FieldKind::OptionalText => Ok(FilterValue::Text(raw.to_string())),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(FilterValue::Integer)
            .map_err(|_| format!("'{raw}' is not an integer")),
        FieldKind::Boolean => parse_bool(raw)
            .map(FilterValue::Boolean)
            .ok_or_else(|| format!("'{raw}' is not a boolean")),
        FieldKind::Timestamp => chrono::DateTime::parse_from_rfc3339(raw.trim())
            .map(|ts| FilterValue::Timestamp(ts.with_timezone(&chrono::Utc)))
            .map_err(|_| format!("'{raw}' is not an RFC 3339 timestamp")),
    }
}

/// Query-string boolean: `true`/`false`/`1`/`0`, case-insensitive.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Management query
// ---------------------------------------------------------------------------

/// Everything a management listing can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementQuery {
    pub search_query: Option<String>,
    pub page_number: i64,
    pub page_size: i64,
    pub is_active: bool,
    pub sort: Option<SortRequest>,
    pub filters: Vec<FilterRequest>,
}

impl Default for ManagementQuery {
    fn default() -> Self {
        Self {
            search_query: None,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            is_active: true,
            sort: None,
            filters: Vec::new(),
        }
    }
}

/// A fully validated management listing, ready for a storage backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub is_active: bool,
    /// Trimmed, non-empty search text.
    pub search: Option<String>,
    pub sort: Option<SortSpec>,
    pub filters: Vec<FilterSpec>,
    pub page: PageRequest,
}

impl ManagementQuery {
    /// Validate against an entity's field catalog.
    pub fn resolve(&self, fields: &'static [FieldDef]) -> Result<ListQuery, QueryError> {
        let page = PageRequest::new(self.page_number, self.page_size)?;
        let sort = self
            .sort
            .as_ref()
            .map(|s| resolve_sort(fields, s))
            .transpose()?;
        let filters = resolve_filters(fields, &self.filters)?;
        let search = self
            .search_query
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ListQuery {
            is_active: self.is_active,
            search,
            sort,
            filters,
            page,
        })
    }

    /// Parse the query-string wire form. Unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self, QueryError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ManagementQuery::default();
        let mut sort_by: Option<String> = None;
        let mut sort_dir = SortDirection::Asc;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "search" => {
                    let trimmed = value.trim();
                    query.search_query = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                "page" => query.page_number = parse_int(key, value)?,
                "pageSize" | "page_size" => query.page_size = parse_int(key, value)?,
                "isActive" | "is_active" => {
                    query.is_active = parse_bool(value).ok_or_else(|| {
                        QueryError::InvalidParameter {
                            name: key.to_string(),
                            value: value.to_string(),
                        }
                    })?;
                }
                "sortBy" | "sort_by" => {
                    let trimmed = value.trim();
                    sort_by = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                "sortDir" | "sort_dir" => sort_dir = value.parse()?,
                _ => {
                    if let Some(filter) = parse_filter_key(key, value)? {
                        query.filters.push(filter);
                    }
                }
            }
        }

        query.sort = sort_by.map(|field| SortRequest {
            field,
            direction: sort_dir,
        });
        Ok(query)
    }

    /// Render the query-string wire form accepted by [`Self::from_pairs`].
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search_query {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.push(("page".to_string(), self.page_number.to_string()));
        pairs.push(("pageSize".to_string(), self.page_size.to_string()));
        pairs.push(("isActive".to_string(), self.is_active.to_string()));
        if let Some(sort) = &self.sort {
            pairs.push(("sortBy".to_string(), sort.field.clone()));
            pairs.push(("sortDir".to_string(), sort.direction.as_str().to_string()));
        }
        for filter in &self.filters {
            pairs.push((
                format!("filter[{}][{}]", filter.field, filter.operator),
                filter.value.clone(),
            ));
        }
        pairs
    }
}

fn parse_int(name: &str, value: &str) -> Result<i64, QueryError> {
    value
        .trim()
        .parse()
        .map_err(|_| QueryError::InvalidPagination(format!("{name} must be an integer, got '{value}'")))
}

/// Parse `filter[field]` (operator `eq`) or `filter[field][op]`.
///
/// Returns `Ok(None)` for keys that are not filter keys at all.
fn parse_filter_key(key: &str, value: &str) -> Result<Option<FilterRequest>, QueryError> {
    let Some(rest) = key.strip_prefix("filter[") else {
        return Ok(None);
    };

    let malformed = || QueryError::InvalidFilter {
        field: key.to_string(),
        reason: "expected filter[field] or filter[field][operator]".into(),
    };

    let (field, tail) = rest.split_once(']').ok_or_else(malformed)?;
    if field.trim().is_empty() {
        return Err(malformed());
    }

    let operator = if tail.is_empty() {
        FilterOperator::Eq
    } else {
        let token = tail
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .ok_or_else(malformed)?;
        parse_operator(token).ok_or_else(|| QueryError::InvalidFilter {
            field: field.to_string(),
            reason: format!("unknown operator '{token}'"),
        })?
    };

    Ok(Some(FilterRequest::new(field.trim(), operator, value)))
}
