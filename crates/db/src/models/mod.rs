//! Domain model structs and DTOs.
//!
//! Each entity module contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO replacing the entity's mutable fields
//!
//! Column groups shared by every catalog table ([`ImageLocations`],
//! [`RecordMeta`]) are flattened into the entity structs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::fields::FieldValue;
use stainmanager_core::types::Timestamp;
use validator::Validate;

pub mod species;
pub mod texture;

/// Stored image paths for a catalog entity.
///
/// Doubles as the request body for the image-location update; absent fields
/// clear the stored location.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize, Validate)]
pub struct ImageLocations {
    #[validate(length(max = 1024))]
    pub full_image_location: Option<String>,
    #[validate(length(max = 1024))]
    pub thumbnail_image_location: Option<String>,
}

impl ImageLocations {
    pub fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "full_image_location" => Some(FieldValue::Text(self.full_image_location.as_deref())),
            "thumbnail_image_location" => {
                Some(FieldValue::Text(self.thumbnail_image_location.as_deref()))
            }
            _ => None,
        }
    }

    /// `(column, value)` pairs for an UPDATE.
    pub fn columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("full_image_location", self.full_image_location.clone()),
            ("thumbnail_image_location", self.thumbnail_image_location.clone()),
        ]
    }
}

/// Soft-delete flag and audit columns.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RecordMeta {
    pub is_active: bool,
    pub created_by: String,
    pub created_date_time: Timestamp,
    pub updated_by: String,
    pub updated_date_time: Timestamp,
}

impl RecordMeta {
    /// Metadata for a freshly created, active row.
    pub fn created(stamp: &AuditStamp) -> Self {
        Self {
            is_active: true,
            created_by: stamp.actor.clone(),
            created_date_time: stamp.at,
            updated_by: stamp.actor.clone(),
            updated_date_time: stamp.at,
        }
    }

    pub fn stamp(&mut self, stamp: &AuditStamp) {
        self.updated_by = stamp.actor.clone();
        self.updated_date_time = stamp.at;
    }

    pub fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "is_active" => Some(FieldValue::Boolean(self.is_active)),
            "created_by" => Some(FieldValue::Text(Some(&self.created_by))),
            "created_date_time" => Some(FieldValue::Timestamp(self.created_date_time)),
            "updated_by" => Some(FieldValue::Text(Some(&self.updated_by))),
            "updated_date_time" => Some(FieldValue::Timestamp(self.updated_date_time)),
            _ => None,
        }
    }
}
