//! Species entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::fields::{FieldDef, FieldKind, FieldValue, Queryable};
use stainmanager_core::types::DbId;
use stainmanager_core::validation::not_blank;
use validator::Validate;

use crate::entity::CatalogEntity;
use crate::models::{ImageLocations, RecordMeta};

/// A row from the `species` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Species {
    pub id: DbId,
    pub name: String,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub images: ImageLocations,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: RecordMeta,
}

/// DTO for creating a new species.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSpecies {
    #[validate(length(min = 1, max = 200), custom(function = not_blank))]
    pub name: String,
    #[validate(length(max = 200))]
    pub scientific_name: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(length(max = 1024))]
    pub full_image_location: Option<String>,
    #[validate(length(max = 1024))]
    pub thumbnail_image_location: Option<String>,
}

/// DTO for updating a species. Omitted optional fields are cleared.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSpecies {
    #[validate(length(min = 1, max = 200), custom(function = not_blank))]
    pub name: String,
    #[validate(length(max = 200))]
    pub scientific_name: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
}

static FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Integer),
    FieldDef::new("name", FieldKind::Text),
    FieldDef::new("scientific_name", FieldKind::OptionalText),
    FieldDef::new("description", FieldKind::OptionalText),
    FieldDef::new("full_image_location", FieldKind::OptionalText),
    FieldDef::new("thumbnail_image_location", FieldKind::OptionalText),
    FieldDef::new("is_active", FieldKind::Boolean),
    FieldDef::new("created_by", FieldKind::Text),
    FieldDef::new("created_date_time", FieldKind::Timestamp),
    FieldDef::new("updated_by", FieldKind::Text),
    FieldDef::new("updated_date_time", FieldKind::Timestamp),
];

impl Queryable for Species {
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
            "scientific_name" => Some(FieldValue::Text(self.scientific_name.as_deref())),
            "description" => Some(FieldValue::Text(self.description.as_deref())),
            _ => self
                .images
                .field_value(field)
                .or_else(|| self.record.field_value(field)),
        }
    }
}

impl CatalogEntity for Species {
    type Create = CreateSpecies;
    type Update = UpdateSpecies;

    const ENTITY: &'static str = "Species";
    const RESOURCE: &'static str = "Species";
    const TABLE: &'static str = "species";
    const COLUMNS: &'static str = "id, name, scientific_name, description, \
        full_image_location, thumbnail_image_location, is_active, \
        created_by, created_date_time, updated_by, updated_date_time";
    const FIELDS: &'static [FieldDef] = FIELDS;

    fn from_create(id: DbId, input: &CreateSpecies, stamp: &AuditStamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            scientific_name: input.scientific_name.clone(),
            description: input.description.clone(),
            images: ImageLocations {
                full_image_location: input.full_image_location.clone(),
                thumbnail_image_location: input.thumbnail_image_location.clone(),
            },
            record: RecordMeta::created(stamp),
        }
    }

    fn apply_update(&mut self, input: &UpdateSpecies) {
        self.name = input.name.clone();
        self.scientific_name = input.scientific_name.clone();
        self.description = input.description.clone();
    }

    fn insert_columns(input: &CreateSpecies) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(input.name.clone())),
            ("scientific_name", input.scientific_name.clone()),
            ("description", input.description.clone()),
            ("full_image_location", input.full_image_location.clone()),
            ("thumbnail_image_location", input.thumbnail_image_location.clone()),
        ]
    }

    fn update_columns(input: &UpdateSpecies) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(input.name.clone())),
            ("scientific_name", input.scientific_name.clone()),
            ("description", input.description.clone()),
        ]
    }

    fn record_mut(&mut self) -> &mut RecordMeta {
        &mut self.record
    }

    fn images_mut(&mut self) -> &mut ImageLocations {
        &mut self.images
    }
}
