use std::sync::Arc;

use stainmanager_db::repositories::{SpeciesRepo, TextureRepo};
use stainmanager_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: repositories share their store behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub species: SpeciesRepo,
    pub textures: TextureRepo,
}

impl AppState {
    /// State whose repositories read and write PostgreSQL through `pool`.
    pub fn postgres(config: ServerConfig, pool: DbPool) -> Self {
        Self {
            config: Arc::new(config),
            species: SpeciesRepo::postgres(pool.clone()),
            textures: TextureRepo::postgres(pool),
        }
    }

    /// State backed by fresh in-memory stores.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            species: SpeciesRepo::in_memory(),
            textures: TextureRepo::in_memory(),
        }
    }
}
