//! Drives the real API router over TCP through `CatalogClient`.

use assert_matches::assert_matches;
use stainmanager_api::config::{ServerConfig, StorageConfig};
use stainmanager_api::router::build_app_router;
use stainmanager_api::state::AppState;
use stainmanager_client::{CatalogClient, ClientConfig, ClientError};
use stainmanager_core::query::{FilterOperator, FilterRequest, ManagementQuery, SortRequest};
use stainmanager_db::models::species::{CreateSpecies, Species, UpdateSpecies};
use stainmanager_db::models::texture::{CreateTexture, Texture};
use stainmanager_db::models::ImageLocations;

/// Serve a fresh in-memory API on an ephemeral port and return a client config for it.
async fn spawn_api() -> ClientConfig {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageConfig::Memory,
    };
    let app = build_app_router(AppState::in_memory(config.clone()), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ClientConfig::new(format!("http://{addr}")).unwrap()
}

fn new_species(name: &str) -> CreateSpecies {
    CreateSpecies {
        name: name.to_string(),
        scientific_name: None,
        description: None,
        full_image_location: None,
        thumbnail_image_location: None,
    }
}

// ---------------------------------------------------------------------------
// Test: full lifecycle through the client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn species_lifecycle() {
    let config = spawn_api().await;
    let client = CatalogClient::<Species>::new(&config).with_actor("frank");

    let created = client.create(&new_species("Oak")).await.unwrap();
    assert_eq!(created.record.created_by, "frank");

    let fetched = client.get(created.id, false).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = client
        .update(
            created.id,
            &UpdateSpecies {
                name: "Red Oak".into(),
                scientific_name: Some("Quercus rubra".into()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Red Oak");

    let images = ImageLocations {
        full_image_location: Some("/img/oak.png".into()),
        thumbnail_image_location: None,
    };
    let updated = client
        .update_image_locations(created.id, &images)
        .await
        .unwrap();
    assert_eq!(updated.images, images);

    assert!(client.delete(created.id).await.unwrap());
    assert!(client.get(created.id, false).await.unwrap().is_none());
    assert!(client.get(created.id, true).await.unwrap().is_some());
    assert_eq!(client.all(false).await.unwrap().len(), 1);

    assert!(client.restore(created.id).await.unwrap());
    assert!(client.get(created.id, false).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: management query wire form
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_sends_query_parameters() {
    let config = spawn_api().await;
    let client = CatalogClient::<Texture>::new(&config);
    for name in ["Ash", "Oak", "Olive", "Pine"] {
        client
            .create(&CreateTexture {
                name: name.to_string(),
                full_image_location: None,
                thumbnail_image_location: None,
            })
            .await
            .unwrap();
    }

    let query = ManagementQuery {
        page_size: 1,
        page_number: 2,
        sort: Some(SortRequest::desc("name")),
        filters: vec![FilterRequest::new("name", FilterOperator::StartsWith, "o")],
        ..Default::default()
    };
    let page = client.list(&query).await.unwrap();

    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Oak");
}

// ---------------------------------------------------------------------------
// Test: error bodies surface as ClientError::Api
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_errors_carry_code_and_message() {
    let config = spawn_api().await;
    let client = CatalogClient::<Species>::new(&config);

    assert_matches!(
        client.delete(404).await,
        Err(ClientError::Api { status: 404, ref code, .. }) if code == "NOT_FOUND"
    );

    let query = ManagementQuery {
        sort: Some(SortRequest::asc("colour")),
        ..Default::default()
    };
    assert_matches!(
        client.list(&query).await,
        Err(ClientError::Api { status: 400, ref code, .. }) if code == "VALIDATION_ERROR"
    );
}

// ---------------------------------------------------------------------------
// Test: a wrong base address is an error, not a missing entity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_is_not_a_missing_entity() {
    let config = spawn_api().await;
    let client = CatalogClient::<Species>::new(&config);
    assert!(client.get(99, false).await.unwrap().is_none());

    let misrouted = ClientConfig::new(format!("{}/stain", config.base_address)).unwrap();
    let client = CatalogClient::<Species>::new(&misrouted);
    assert_matches!(
        client.get(99, false).await,
        Err(ClientError::Api { status: 404, ref message, .. }) if message == "Route not found"
    );
}

