use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;
use wayfarer_core::{CategoryPayload, TourCategory};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::{guarded, ADMIN};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/tour/category", get(list_categories))
        .route("/api/tour/category/{id}", get(get_category));

    let admin = Router::new()
        .route("/api/tour/category", post(create_category))
        .route(
            "/api/tour/category/{id}",
            put(update_category).delete(delete_category),
        );

    public.merge(guarded(state, ADMIN, admin))
}

/// GET /api/tour/category
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<TourCategory>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// GET /api/tour/category/{id}
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<TourCategory>> {
    Ok(Json(state.catalog.get_category(id).await?))
}

/// POST /api/tour/category
/// Creates the category and its companion tour; rolls the category back if
/// the tour cannot be written.
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> AppResult<(StatusCode, Json<TourCategory>)> {
    let category = state.catalog.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/tour/category/{id}
pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> AppResult<Json<TourCategory>> {
    Ok(Json(state.catalog.update_category(id, payload).await?))
}

/// DELETE /api/tour/category/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    let removed = state.catalog.delete_category(id).await?;
    Ok(Json(json!({
        "message": "Category and associated tours deleted successfully",
        "deletedTours": removed,
    })))
}
