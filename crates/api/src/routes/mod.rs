pub mod catalog;
pub mod health;

use axum::Router;
use stainmanager_db::entity::CatalogEntity;
use stainmanager_db::models::species::Species;
use stainmanager_db::models::texture::Texture;

use crate::state::AppState;

/// Build the `/api` route tree: one nested router per catalog resource.
///
/// ```text
/// /Species    species catalog
/// /Texture    texture catalog
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(&format!("/{}", Species::RESOURCE), catalog::router::<Species>())
        .nest(&format!("/{}", Texture::RESOURCE), catalog::router::<Texture>())
}
