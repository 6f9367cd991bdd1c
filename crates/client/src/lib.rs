//! Typed HTTP client for the StainManager Web API.
//!
//! A UI host builds one [`ClientConfig`] from its base address and creates a
//! [`CatalogClient`] per entity:
//!
//! ```ignore
//! let config = ClientConfig::from_env()?;
//! let species = CatalogClient::<Species>::new(&config);
//! let page = species.list(&ManagementQuery::default()).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::CatalogClient;
pub use config::ClientConfig;
pub use error::ClientError;
