//! Handlers shared by every catalog resource (`/api/Species`, `/api/Texture`).
//!
//! Each handler is generic over a [`CatalogResource`] and instantiated once
//! per entity in `routes::catalog`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stainmanager_core::error::CoreError;
use stainmanager_core::query::ManagementQuery;
use stainmanager_core::types::DbId;
use stainmanager_db::entity::CatalogEntity;
use stainmanager_db::models::species::Species;
use stainmanager_db::models::texture::Texture;
use stainmanager_db::models::ImageLocations;
use stainmanager_db::repositories::CatalogRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::actor::RequestActor;
use crate::query::{IncludeInactiveParams, IsActiveParams};
use crate::response::{ChangedResponse, DataResponse};
use crate::state::AppState;

/// A catalog entity served over HTTP.
pub trait CatalogResource: CatalogEntity {
    /// The repository for this entity inside the shared state.
    fn repo(state: &AppState) -> &CatalogRepo<Self>;
}

impl CatalogResource for Species {
    fn repo(state: &AppState) -> &CatalogRepo<Self> {
        &state.species
    }
}

impl CatalogResource for Texture {
    fn repo(state: &AppState) -> &CatalogRepo<Self> {
        &state.textures
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/{Resource}?search=&page=&pageSize=&isActive=&sortBy=&sortDir=&filter[..]=
///
/// One page of the management listing.
pub async fn list<E: CatalogResource>(
    State(state): State<AppState>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let query = ManagementQuery::from_pairs(&pairs)?;
    let page = E::repo(&state).get_for_management(&query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/{Resource}/all?isActive=true
pub async fn all<E: CatalogResource>(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<IsActiveParams>,
) -> AppResult<impl IntoResponse> {
    let items = E::repo(&state).get_all(params.is_active).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/{Resource}/{id}?includeInactive=false
pub async fn get_by_id<E: CatalogResource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let entity = E::repo(&state)
        .get_by_id(id, params.include_inactive)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: E::ENTITY,
            id,
        }))?;
    Ok(Json(DataResponse { data: entity }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/{Resource}
pub async fn create<E: CatalogResource>(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    ApiJson(input): ApiJson<E::Create>,
) -> AppResult<impl IntoResponse> {
    let entity = E::repo(&state).create(&input, &actor).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entity })))
}

/// PUT /api/{Resource}/{id}
///
/// Soft-deleted entities cannot be updated and answer 404.
pub async fn update<E: CatalogResource>(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<E::Update>,
) -> AppResult<impl IntoResponse> {
    let entity = E::repo(&state).update(id, &input, &actor).await?;
    Ok(Json(DataResponse { data: entity }))
}

/// PUT /api/{Resource}/{id}/images
pub async fn update_images<E: CatalogResource>(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<ImageLocations>,
) -> AppResult<impl IntoResponse> {
    let entity = E::repo(&state)
        .update_image_locations(id, &input, &actor)
        .await?;
    Ok(Json(DataResponse { data: entity }))
}

/// DELETE /api/{Resource}/{id}
pub async fn delete<E: CatalogResource>(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let changed = E::repo(&state).delete(id, &actor).await?;
    Ok(Json(DataResponse {
        data: ChangedResponse { changed },
    }))
}

/// POST /api/{Resource}/{id}/restore
pub async fn restore<E: CatalogResource>(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let changed = E::repo(&state).restore(id, &actor).await?;
    Ok(Json(DataResponse {
        data: ChangedResponse { changed },
    }))
}
