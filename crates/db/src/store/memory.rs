//! In-process catalog store.
//!
//! Rows live in a `BTreeMap` behind a tokio `RwLock`; each mutation holds the
//! write lock for its whole check-then-write step. Management queries run
//! through the shared in-memory pipeline so results match the SQL backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use stainmanager_core::audit::AuditStamp;
use stainmanager_core::pagination::Page;
use stainmanager_core::pipeline;
use stainmanager_core::query::ListQuery;
use stainmanager_core::types::DbId;
use tokio::sync::RwLock;

use crate::entity::CatalogEntity;
use crate::models::ImageLocations;
use crate::store::CatalogStore;

/// Catalog store holding rows in memory. Ids start at 1.
pub struct MemoryCatalogStore<E> {
    rows: RwLock<BTreeMap<DbId, E>>,
    next_id: AtomicI64,
}

impl<E> MemoryCatalogStore<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<E> Default for MemoryCatalogStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CatalogEntity> MemoryCatalogStore<E> {
    /// Apply `mutate` to the row with `id` if it is active.
    async fn mutate_active(&self, id: DbId, mutate: impl FnOnce(&mut E) + Send) -> Option<E> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).filter(|row| row.is_active())?;
        mutate(row);
        Some(row.clone())
    }
}

#[async_trait]
impl<E: CatalogEntity> CatalogStore<E> for MemoryCatalogStore<E> {
    async fn list(&self, is_active: bool) -> Result<Vec<E>, sqlx::Error> {
        let rows = self.rows.read().await;
        let mut items: Vec<E> = rows
            .values()
            .filter(|row| row.is_active() == is_active)
            .cloned()
            .collect();
        pipeline::apply_default_order(&mut items);
        Ok(items)
    }

    async fn query(&self, query: &ListQuery) -> Result<Page<E>, sqlx::Error> {
        let snapshot: Vec<E> = self.rows.read().await.values().cloned().collect();
        Ok(pipeline::execute(snapshot, query))
    }

    async fn find_by_id(
        &self,
        id: DbId,
        include_inactive: bool,
    ) -> Result<Option<E>, sqlx::Error> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&id)
            .filter(|row| include_inactive || row.is_active())
            .cloned())
    }

    async fn insert(&self, input: &E::Create, stamp: &AuditStamp) -> Result<E, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = E::from_create(id, input, stamp);
        rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: DbId,
        input: &E::Update,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error> {
        Ok(self
            .mutate_active(id, |row| {
                row.apply_update(input);
                row.record_mut().stamp(stamp);
            })
            .await)
    }

    async fn update_image_locations(
        &self,
        id: DbId,
        images: &ImageLocations,
        stamp: &AuditStamp,
    ) -> Result<Option<E>, sqlx::Error> {
        Ok(self
            .mutate_active(id, |row| {
                *row.images_mut() = images.clone();
                row.record_mut().stamp(stamp);
            })
            .await)
    }

    async fn set_active(
        &self,
        id: DbId,
        active: bool,
        stamp: &AuditStamp,
    ) -> Result<Option<bool>, sqlx::Error> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        let was_active = row.is_active();
        if !active && !was_active {
            return Ok(None);
        }
        let record = row.record_mut();
        record.is_active = active;
        record.stamp(stamp);
        Ok(Some(was_active != active))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
