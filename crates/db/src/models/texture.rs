//! Texture entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::fields::{FieldDef, FieldKind, FieldValue, Queryable};
use stainmanager_core::types::DbId;
use stainmanager_core::validation::not_blank;
use validator::Validate;

use crate::entity::CatalogEntity;
use crate::models::{ImageLocations, RecordMeta};

/// A row from the `textures` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Texture {
    pub id: DbId,
    pub name: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub images: ImageLocations,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: RecordMeta,
}

/// DTO for creating a new texture.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTexture {
    #[validate(length(min = 1, max = 200), custom(function = not_blank))]
    pub name: String,
    #[validate(length(max = 1024))]
    pub full_image_location: Option<String>,
    #[validate(length(max = 1024))]
    pub thumbnail_image_location: Option<String>,
}

/// DTO for updating a texture. Image locations change via their own endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTexture {
    #[validate(length(min = 1, max = 200), custom(function = not_blank))]
    pub name: String,
}

static FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Integer),
    FieldDef::new("name", FieldKind::Text),
    FieldDef::new("full_image_location", FieldKind::OptionalText),
    FieldDef::new("thumbnail_image_location", FieldKind::OptionalText),
    FieldDef::new("is_active", FieldKind::Boolean),
    FieldDef::new("created_by", FieldKind::Text),
    FieldDef::new("created_date_time", FieldKind::Timestamp),
    FieldDef::new("updated_by", FieldKind::Text),
    FieldDef::new("updated_date_time", FieldKind::Timestamp),
];

impl Queryable for Texture {
    fn id(&self) -> DbId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.record.is_active
    }

    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "id" => Some(FieldValue::Integer(self.id)),
            "name" => Some(FieldValue::Text(Some(&self.name))),
            _ => self
                .images
                .field_value(field)
                .or_else(|| self.record.field_value(field)),
        }
    }
}

impl CatalogEntity for Texture {
    type Create = CreateTexture;
    type Update = UpdateTexture;

    const ENTITY: &'static str = "Texture";
    const RESOURCE: &'static str = "Texture";
    const TABLE: &'static str = "textures";
    const COLUMNS: &'static str = "id, name, full_image_location, thumbnail_image_location, \
        is_active, created_by, created_date_time, updated_by, updated_date_time";
    const FIELDS: &'static [FieldDef] = FIELDS;

    fn from_create(id: DbId, input: &CreateTexture, stamp: &AuditStamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            images: ImageLocations {
                full_image_location: input.full_image_location.clone(),
                thumbnail_image_location: input.thumbnail_image_location.clone(),
            },
            record: RecordMeta::created(stamp),
        }
    }

    fn apply_update(&mut self, input: &UpdateTexture) {
        self.name = input.name.clone();
    }

    fn insert_columns(input: &CreateTexture) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(input.name.clone())),
            ("full_image_location", input.full_image_location.clone()),
            ("thumbnail_image_location", input.thumbnail_image_location.clone()),
        ]
    }

    fn update_columns(input: &UpdateTexture) -> Vec<(&'static str, Option<String>)> {
        vec![("name", Some(input.name.clone()))]
    }

    fn record_mut(&mut self) -> &mut RecordMeta {
        &mut self.record
    }

    fn images_mut(&mut self) -> &mut ImageLocations {
        &mut self.images
    }
}
