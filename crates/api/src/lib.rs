//! HTTP boundary for the StainManager catalog.
//!
//! Exposes one resource per catalog entity under `/api/{Resource}` plus a
//! root-level `/health` probe. [`router::build_app_router`] assembles the
//! full middleware stack shared by the binary and the integration tests.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
