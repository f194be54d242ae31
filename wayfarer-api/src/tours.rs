use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;
use wayfarer_core::{Tour, TourPayload};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::{guarded, ADMIN};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/tours", get(list_tours))
        .route("/api/tour/{id}", get(get_tour));

    let admin = Router::new()
        .route("/api/tour/{id}", delete(delete_tour))
        .route("/api/tour/package", post(create_tour))
        .route("/api/tour/package/{id}", put(update_tour));

    public.merge(guarded(state, ADMIN, admin))
}

/// GET /api/tours
pub async fn list_tours(State(state): State<AppState>) -> AppResult<Json<Vec<Tour>>> {
    Ok(Json(state.catalog.list_tours().await?))
}

/// GET /api/tour/{id}
pub async fn get_tour(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Tour>> {
    Ok(Json(state.catalog.get_tour(id).await?))
}

/// POST /api/tour/package
pub async fn create_tour(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TourPayload>,
) -> AppResult<(StatusCode, Json<Tour>)> {
    let tour = state.catalog.create_tour(payload).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

/// PUT /api/tour/package/{id}
/// Replaces every tracked field; omitted fields are cleared.
pub async fn update_tour(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<TourPayload>,
) -> AppResult<Json<Tour>> {
    Ok(Json(state.catalog.update_tour(id, payload).await?))
}

/// DELETE /api/tour/{id}
pub async fn delete_tour(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    state.catalog.delete_tour(id).await?;
    Ok(Json(json!({ "message": "Tour deleted successfully" })))
}
