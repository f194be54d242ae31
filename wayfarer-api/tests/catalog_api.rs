mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;
use wayfarer_api::middleware::Role;
use wayfarer_api::{app, AppState};
use wayfarer_catalog::CatalogService;
use wayfarer_core::repository::{StoreError, StoreResult, TourRepository};
use wayfarer_core::Tour;
use wayfarer_store::InMemoryStore;

use common::{caller, send, test_app, SECRET};

fn tour_body() -> Value {
    json!({
        "name": "Kerala Backwaters",
        "type": "Leisure",
        "description": "Houseboat stay",
        "image": "uploads\\kerala.jpg",
        "price": 0,
        "rating": 0,
        "reviews": 12,
        "location": "Alleppey",
        "duration": 4,
        "photos": ["a.jpg"],
        "inclusions": ["Meals"],
        "tourPlan": [{ "day": 1, "name": "Arrival", "description": "Check in" }],
        "availableFrom": "2025-01-01",
        "availableTill": "2025-03-31T00:00:00Z",
        "featured": true
    })
}

fn id_of(value: &Value) -> String {
    value["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_tour_package_requires_admin() {
    let app = test_app();
    let user = caller(Role::User, "Ravi");

    let (status, body) = send(&app, Method::POST, "/api/tour/package", None, Some(tour_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, Method::POST, "/api/tour/package", Some(&user.token), Some(tour_body())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::POST, "/api/tour/package", Some("garbage"), Some(tour_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tour_lifecycle() {
    let app = test_app();
    let admin = caller(Role::Admin, "Meera");

    let (status, created) =
        send(&app, Method::POST, "/api/tour/package", Some(&admin.token), Some(tour_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["image"], "uploads/kerala.jpg");
    assert_eq!(created["price"], 0.0);
    assert_eq!(created["duration"], "4");
    assert_eq!(created["tourPlan"][0]["day"], "1");
    let id = id_of(&created);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/tour/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Kerala Backwaters");

    // full overwrite: fields left out of the payload are cleared
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/tour/package/{}", id),
        Some(&admin.token),
        Some(json!({ "name": "Kerala Lagoons", "price": 18000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Kerala Lagoons");
    assert_eq!(updated["location"], Value::Null);
    assert_eq!(updated["inclusions"], json!([]));
    assert_eq!(updated["featured"], false);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/tour/{}", id), Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/tour/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Tour not found");
}

#[tokio::test]
async fn test_tour_creation_lists_missing_fields() {
    let app = test_app();
    let admin = caller(Role::Admin, "Meera");

    let mut body = tour_body();
    body.as_object_mut().unwrap().remove("location");
    body.as_object_mut().unwrap().remove("tourPlan");

    let (status, error) = send(&app, Method::POST, "/api/tour/package", Some(&admin.token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = error["message"].as_str().unwrap();
    assert!(message.contains("location"));
    assert!(message.contains("tourPlan"));

    let (_, tours) = send(&app, Method::GET, "/api/tours", None, None).await;
    assert_eq!(tours, json!([]));
}

#[tokio::test]
async fn test_category_workflows() {
    let app = test_app();
    let admin = caller(Role::Admin, "Meera");

    let (status, category) = send(
        &app,
        Method::POST,
        "/api/tour/category",
        Some(&admin.token),
        Some(json!({ "category": "Wildlife", "description": "Safaris" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = id_of(&category);

    let (_, tours) = send(&app, Method::GET, "/api/tours", None, None).await;
    assert_eq!(tours.as_array().unwrap().len(), 1);
    assert_eq!(tours[0]["category"], "Wildlife");
    assert_eq!(tours[0]["types"], json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tour/category",
        Some(&admin.token),
        Some(json!({ "category": "Wildlife", "description": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tour/category",
        Some(&admin.token),
        Some(json!({ "category": "Hills" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, renamed) = send(
        &app,
        Method::PUT,
        &format!("/api/tour/category/{}", id),
        Some(&admin.token),
        Some(json!({ "category": "Jungle", "description": "Tigers" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["category"], "Jungle");

    let (_, tours) = send(&app, Method::GET, "/api/tours", None, None).await;
    assert_eq!(tours[0]["category"], "Jungle");
    assert_eq!(tours[0]["description"], "Tigers");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/tour/category/{}", id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedTours"], 1);

    let (_, tours) = send(&app, Method::GET, "/api/tours", None, None).await;
    assert_eq!(tours, json!([]));
    let (status, _) = send(&app, Method::GET, &format!("/api/tour/category/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_category_update_is_not_found() {
    let app = test_app();
    let admin = caller(Role::Admin, "Meera");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/tour/category/{}", Uuid::new_v4()),
        Some(&admin.token),
        Some(json!({ "category": "X", "description": "Y" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tour writes always fail; everything else goes to the shared store.
struct UnwritableTours(Arc<InMemoryStore>);

#[async_trait]
impl TourRepository for UnwritableTours {
    async fn list_tours(&self) -> StoreResult<Vec<Tour>> {
        self.0.list_tours().await
    }
    async fn get_tour(&self, id: Uuid) -> StoreResult<Option<Tour>> {
        self.0.get_tour(id).await
    }
    async fn create_tour(&self, _tour: &Tour) -> StoreResult<()> {
        Err(StoreError::backend("connection reset"))
    }
    async fn replace_tour(&self, tour: &Tour) -> StoreResult<()> {
        self.0.replace_tour(tour).await
    }
    async fn delete_tour(&self, id: Uuid) -> StoreResult<bool> {
        self.0.delete_tour(id).await
    }
    async fn retag_tours(&self, old: &str, category: &str, description: &str) -> StoreResult<u64> {
        self.0.retag_tours(old, category, description).await
    }
    async fn delete_tours_by_category(&self, category: &str) -> StoreResult<u64> {
        self.0.delete_tours_by_category(category).await
    }
}

#[tokio::test]
async fn test_failed_companion_tour_leaves_no_category() {
    let store = Arc::new(InMemoryStore::new());
    let mut state = AppState::in_memory(SECRET);
    state.catalog = Arc::new(CatalogService::new(
        Arc::new(UnwritableTours(store.clone())),
        store,
    ));
    let app = app(state);
    let admin = caller(Role::Admin, "Meera");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tour/category",
        Some(&admin.token),
        Some(json!({ "category": "Desert", "description": "Dunes" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to create package for the new category");

    let (_, categories) = send(&app, Method::GET, "/api/tour/category", None, None).await;
    assert_eq!(categories, json!([]));
}
