//! Repository layer.
//!
//! [`CatalogRepo`] holds the soft-delete and audit rules for any catalog
//! entity on top of a [`crate::store::CatalogStore`]. Per-entity aliases keep
//! call sites readable.

pub mod catalog_repo;

pub use catalog_repo::CatalogRepo;

use crate::models::species::Species;
use crate::models::texture::Texture;

pub type SpeciesRepo = CatalogRepo<Species>;
pub type TextureRepo = CatalogRepo<Texture>;
