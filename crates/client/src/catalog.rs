//! Per-entity client for `/api/{Resource}`.

use std::marker::PhantomData;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use stainmanager_core::pagination::Page;
use stainmanager_core::query::ManagementQuery;
use stainmanager_core::types::DbId;
use stainmanager_db::entity::CatalogEntity;
use stainmanager_db::models::ImageLocations;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Header naming the acting principal.
const ACTOR_HEADER: &str = "x-actor";

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Changed {
    changed: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// HTTP client for one catalog resource.
pub struct CatalogClient<E> {
    client: reqwest::Client,
    config: ClientConfig,
    actor: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CatalogClient<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
            actor: self.actor.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: CatalogEntity> CatalogClient<E> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            config: config.clone(),
            actor: None,
            _entity: PhantomData,
        }
    }

    /// Send `name` as the acting principal on mutations.
    pub fn with_actor(mut self, name: impl Into<String>) -> Self {
        self.actor = Some(name.into());
        self
    }

    /// One page of the management listing.
    pub async fn list(&self, query: &ManagementQuery) -> Result<Page<E>, ClientError> {
        let response = self
            .client
            .get(self.url(""))
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Every entity with the given active flag, ordered by name.
    pub async fn all(&self, is_active: bool) -> Result<Vec<E>, ClientError> {
        let response = self
            .client
            .get(self.url("/all"))
            .query(&[("isActive", is_active)])
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Fetch one entity; `None` when the API reports this entity missing.
    ///
    /// Any other 404 (e.g. an unknown route from a wrong base address) is an
    /// error.
    pub async fn get(&self, id: DbId, include_inactive: bool) -> Result<Option<E>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/{id}")))
            .query(&[("includeInactive", include_inactive)])
            .send()
            .await?;
        match Self::parse_data(response).await {
            Ok(entity) => Ok(Some(entity)),
            Err(ClientError::Api {
                status,
                ref code,
                ref message,
            }) if status == StatusCode::NOT_FOUND.as_u16()
                && code == "NOT_FOUND"
                && *message == format!("{} with id {id} not found", E::ENTITY) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn create(&self, input: &E::Create) -> Result<E, ClientError> {
        let request = self.client.post(self.url("")).json(input);
        let response = self.authored(request).send().await?;
        Self::parse_data(response).await
    }

    pub async fn update(&self, id: DbId, input: &E::Update) -> Result<E, ClientError> {
        let request = self.client.put(self.url(&format!("/{id}"))).json(input);
        let response = self.authored(request).send().await?;
        Self::parse_data(response).await
    }

    pub async fn update_image_locations(
        &self,
        id: DbId,
        images: &ImageLocations,
    ) -> Result<E, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/{id}/images")))
            .json(images);
        let response = self.authored(request).send().await?;
        Self::parse_data(response).await
    }

    /// Soft delete. Returns whether a row changed.
    pub async fn delete(&self, id: DbId) -> Result<bool, ClientError> {
        let request = self.client.delete(self.url(&format!("/{id}")));
        let response = self.authored(request).send().await?;
        Self::parse_data::<Changed>(response).await.map(|c| c.changed)
    }

    /// Restore a soft-deleted entity. Returns whether the flag flipped.
    pub async fn restore(&self, id: DbId) -> Result<bool, ClientError> {
        let request = self.client.post(self.url(&format!("/{id}/restore")));
        let response = self.authored(request).send().await?;
        Self::parse_data::<Changed>(response).await.map(|c| c.changed)
    }

    // ---- private helpers ----

    fn url(&self, suffix: &str) -> String {
        self.config.url(&format!("/api/{}{suffix}", E::RESOURCE))
    }

    fn authored(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.actor {
            Some(actor) => request.header(ACTOR_HEADER, actor),
            None => request,
        }
    }

    /// Unwrap a `{ "data": T }` envelope, or turn an error body into
    /// [`ClientError::Api`].
    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => (body.code, body.error),
                Err(_) => (String::new(), text),
            };
            tracing::debug!(status = status.as_u16(), %code, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}
