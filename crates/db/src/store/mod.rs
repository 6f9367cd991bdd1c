//! Storage backends for catalog entities.
//!
//! [`CatalogStore`] is the seam between the repository and durable storage.
//! Every mutating method is a single atomic step: the existence/active check
//! and the write happen together, so concurrent callers never observe a
//! half-applied change.

use async_trait::async_trait;
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::pagination::Page;
use stainmanager_core::query::ListQuery;
use stainmanager_core::types::DbId;

use crate::entity::CatalogEntity;
use crate::models::ImageLocations;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

#[async_trait]
pub trait CatalogStore<E: CatalogEntity>: Send + Sync {
    /// Every row whose active flag equals `is_active`, ordered by name then id.
    async fn list(&self, is_active: bool) -> Result<Vec<E>, sqlx::Error>;

    /// Execute a resolved management query.
    async fn query(&self, query: &ListQuery) -> Result<Page<E>, sqlx::Error>;

    /// Find a row by id. Inactive rows are only returned with `include_inactive`.
    async fn find_by_id(&self, id: DbId, include_inactive: bool)
        -> Result<Option<E>, sqlx::Error>;

    /// Insert a new active row and return it with its assigned id.
    async fn insert(&self, input: &E::Create, stamp: &AuditStamp) -> Result<E, sqlx::Error>;

    /// Replace the mutable fields of an active row. `None` if no active row matched.
    async fn update(
        &self,
        id: DbId,
        input: &E::Update,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error>;

    /// Replace both image locations of an active row. `None` if no active row matched.
    async fn update_image_locations(
        &self,
        id: DbId,
        images: &ImageLocations,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error>;

    /// Set the active flag and stamp audit fields.
    ///
    /// Deactivation only matches active rows; activation matches any row.
    /// Returns `None` when nothing matched, otherwise whether the flag flipped.
    async fn set_active(
        &self,
        id: DbId,
        active: bool,
        stamp: &AuditStamp,
    ) -> Result<Option<bool>, sqlx::Error>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}
