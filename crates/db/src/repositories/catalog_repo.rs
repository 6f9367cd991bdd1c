//! Generic repository for soft-deletable catalog entities.

use std::sync::Arc;

use stainmanager_core::audit::{Actor, AuditStamp};
use stainmanager_core::error::CoreError;
use stainmanager_core::pagination::Page;
use stainmanager_core::query::ManagementQuery;
use stainmanager_core::types::DbId;
use validator::Validate;

use crate::entity::CatalogEntity;
use crate::error::RepoResult;
use crate::models::ImageLocations;
use crate::store::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
use crate::DbPool;

/// CRUD, soft delete and management queries over one entity type.
///
/// Cloning is cheap; clones share the underlying store.
pub struct CatalogRepo<E: CatalogEntity> {
    store: Arc<dyn CatalogStore<E>>,
}

impl<E: CatalogEntity> Clone for CatalogRepo<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: CatalogEntity> CatalogRepo<E> {
    pub fn new(store: Arc<dyn CatalogStore<E>>) -> Self {
        Self { store }
    }

    /// Repository over the entity's PostgreSQL table.
    pub fn postgres(pool: DbPool) -> Self {
        Self::new(Arc::new(PgCatalogStore::<E>::new(pool)))
    }

    /// Repository over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCatalogStore::<E>::new()))
    }

    /// All entities with the given active flag, ordered by name.
    pub async fn get_all(&self, is_active: bool) -> RepoResult<Vec<E>> {
        Ok(self.store.list(is_active).await?)
    }

    /// One page of a management listing.
    pub async fn get_for_management(&self, query: &ManagementQuery) -> RepoResult<Page<E>> {
        let resolved = query.resolve(E::FIELDS)?;
        Ok(self.store.query(&resolved).await?)
    }

    /// Find an entity by id. Soft-deleted rows need `include_inactive`.
    pub async fn get_by_id(&self, id: DbId, include_inactive: bool) -> RepoResult<Option<E>> {
        Ok(self.store.find_by_id(id, include_inactive).await?)
    }

    pub async fn create(&self, input: &E::Create, actor: &Actor) -> RepoResult<E> {
        input.validate()?;
        let created = self.store.insert(input, &AuditStamp::now(actor)).await?;
        tracing::info!(
            entity = E::ENTITY,
            id = created.id(),
            actor = %actor,
            "Entity created"
        );
        Ok(created)
    }

    /// Replace the mutable fields of an active entity.
    pub async fn update(&self, id: DbId, input: &E::Update, actor: &Actor) -> RepoResult<E> {
        input.validate()?;
        let updated = self
            .store
            .update(id, input, &AuditStamp::now(actor))
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::info!(entity = E::ENTITY, id, actor = %actor, "Entity updated");
        Ok(updated)
    }

    /// Replace both image locations of an active entity. `None` clears a location.
    pub async fn update_image_locations(
        &self,
        id: DbId,
        images: &ImageLocations,
        actor: &Actor,
    ) -> RepoResult<E> {
        images.validate()?;
        let updated = self
            .store
            .update_image_locations(id, images, &AuditStamp::now(actor))
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::info!(entity = E::ENTITY, id, actor = %actor, "Image locations updated");
        Ok(updated)
    }

    /// Soft delete an active entity. Returns whether a row changed.
    pub async fn delete(&self, id: DbId, actor: &Actor) -> RepoResult<bool> {
        let changed = self
            .store
            .set_active(id, false, &AuditStamp::now(actor))
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::info!(entity = E::ENTITY, id, actor = %actor, "Entity soft-deleted");
        Ok(changed)
    }

    /// Reactivate an entity, active or not. Returns whether the flag flipped.
    pub async fn restore(&self, id: DbId, actor: &Actor) -> RepoResult<bool> {
        let changed = self
            .store
            .set_active(id, true, &AuditStamp::now(actor))
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::info!(entity = E::ENTITY, id, actor = %actor, changed, "Entity restored");
        Ok(changed)
    }

    /// Probe the backing store.
    pub async fn ping(&self) -> RepoResult<()> {
        Ok(self.store.ping().await?)
    }
}

fn not_found<E: CatalogEntity>(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: E::ENTITY,
        id,
    }
}
