//! Acting-principal extractor.
//!
//! An upstream authenticating proxy names the caller in the `X-Actor` header.
//! Requests without one act as the system actor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stainmanager_core::audit::Actor;

/// Header carrying the acting principal's name.
pub const ACTOR_HEADER: &str = "x-actor";

/// The principal recorded in audit fields for this request.
///
/// ```ignore
/// async fn my_handler(RequestActor(actor): RequestActor) -> AppResult<Json<()>> {
///     tracing::info!(actor = %actor, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequestActor(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for RequestActor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok());
        Ok(RequestActor(Actor::from_principal(name)))
    }
}
