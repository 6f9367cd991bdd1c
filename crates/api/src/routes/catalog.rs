//! Route definitions for catalog resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::catalog::{self, CatalogResource};
use crate::state::AppState;

/// Routes mounted at `/api/{Resource}`.
///
/// ```text
/// GET    /              -> list (management page)
/// POST   /              -> create
/// GET    /all           -> all
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PUT    /{id}/images   -> update_images
/// POST   /{id}/restore  -> restore
/// ```
pub fn router<E: CatalogResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list::<E>).post(catalog::create::<E>))
        .route("/all", get(catalog::all::<E>))
        .route(
            "/{id}",
            get(catalog::get_by_id::<E>)
                .put(catalog::update::<E>)
                .delete(catalog::delete::<E>),
        )
        .route("/{id}/images", put(catalog::update_images::<E>))
        .route("/{id}/restore", post(catalog::restore::<E>))
}
