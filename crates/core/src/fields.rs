//! Field catalogs: the sortable and filterable columns an entity exposes.
//!
//! Every entity publishes a static `&[FieldDef]`. Sort and filter requests
//! name fields loosely (`updatedDateTime`, `UpdatedDateTime` and
//! `updated_date_time` are the same field); resolution maps them onto the
//! catalog entry whose `name` is the canonical snake_case column name.

use crate::types::{DbId, Timestamp};

/// Storage type of a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    OptionalText,
    Boolean,
    Timestamp,
}

impl FieldKind {
    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::OptionalText)
    }

    /// Human-readable kind name used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Text | FieldKind::OptionalText => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Timestamp => "timestamp",
        }
    }
}

/// One column of an entity's field catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Canonical snake_case column name.
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Look up `requested` in `fields`, ignoring case and underscores.
pub fn find_field(fields: &'static [FieldDef], requested: &str) -> Option<&'static FieldDef> {
    let wanted = normalize(requested);
    if wanted.is_empty() {
        return None;
    }
    fields.iter().find(|f| normalize(f.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A borrowed field value read from an entity for in-memory evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Text(Option<&'a str>),
    Boolean(bool),
    Timestamp(Timestamp),
}

impl FieldValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Text(None))
    }
}

/// Read access an entity grants to the query pipeline.
pub trait Queryable {
    fn id(&self) -> DbId;

    fn name(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Value of the catalog field with canonical name `field`, or `None` when
    /// the entity has no such field.
    fn field_value(&self, field: &str) -> Option<FieldValue<'_>>;
}
