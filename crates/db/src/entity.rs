//! The contract every soft-deletable catalog entity fulfils.
//!
//! Storage backends are written once against [`CatalogEntity`]: the PostgreSQL
//! store builds its SQL from the table name, column list and the
//! `(column, value)` pairs the DTOs produce, while the memory store constructs
//! and mutates entity values directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::fields::{FieldDef, Queryable};
use stainmanager_core::types::DbId;
use validator::Validate;

use crate::models::{ImageLocations, RecordMeta};

pub trait CatalogEntity:
    Queryable
    + Clone
    + Serialize
    + DeserializeOwned
    + for<'r> FromRow<'r, PgRow>
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Insert payload.
    type Create: Validate + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Update payload; replaces every mutable field.
    type Update: Validate + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    /// Path segment under `/api`.
    const RESOURCE: &'static str;

    /// Backing table.
    const TABLE: &'static str;

    /// Column list shared across queries.
    const COLUMNS: &'static str;

    /// Sortable and filterable fields.
    const FIELDS: &'static [FieldDef];

    /// Build the in-memory value of a newly inserted row.
    fn from_create(id: DbId, input: &Self::Create, stamp: &AuditStamp) -> Self;

    /// Copy the mutable fields of `input` onto `self`. Never touches `id` or
    /// the soft-delete flag.
    fn apply_update(&mut self, input: &Self::Update);

    /// `(column, value)` pairs written on insert, excluding identity and metadata.
    fn insert_columns(input: &Self::Create) -> Vec<(&'static str, Option<String>)>;

    /// `(column, value)` pairs written on update.
    fn update_columns(input: &Self::Update) -> Vec<(&'static str, Option<String>)>;

    fn record_mut(&mut self) -> &mut RecordMeta;

    fn images_mut(&mut self) -> &mut ImageLocations;
}
