//! Domain building blocks shared by the StainManager crates.
//!
//! Zero internal dependencies: the query specification, its in-memory
//! evaluation pipeline, audit stamping and the domain error type live here so
//! the repository layer, the API and the client can all use them.

pub mod audit;
pub mod error;
pub mod fields;
pub mod pagination;
pub mod pipeline;
pub mod query;
pub mod types;
pub mod validation;
