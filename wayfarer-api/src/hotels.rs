use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use wayfarer_core::search::{select_hotels, selected, GuestRating, HotelCriteria, StarBucket};
use wayfarer_core::{CoreResult, Hotel, HotelRequest};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::{guarded, Claims, HOTEL_STAFF};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/hotel", get(list_hotels))
        .route("/api/hotel/{id}", get(get_hotel));

    let signed_in = Router::new().route("/api/hotel/user/{id}", get(get_hotel_by_owner));

    let staff = Router::new().route("/api/hotel", post(create_hotel));

    public
        .merge(guarded(state, &[], signed_in))
        .merge(guarded(state, HOTEL_STAFF, staff))
}

/// Search form fields. Every field is optional and "Select ..." placeholders
/// are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelQuery {
    pub location: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub star_rating: Option<String>,
    pub guest_rating: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub amenity: Option<String>,
    /// Comma-separated.
    pub facilities: Option<String>,
}

impl HotelQuery {
    pub fn into_criteria(self) -> CoreResult<HotelCriteria> {
        let text = |raw: &Option<String>| selected(raw.as_deref()).map(str::to_string);

        Ok(HotelCriteria {
            location: text(&self.location),
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            star_rating: selected(self.star_rating.as_deref())
                .map(str::parse::<StarBucket>)
                .transpose()?,
            guest_rating: selected(self.guest_rating.as_deref())
                .map(str::parse::<GuestRating>)
                .transpose()?,
            property_type: text(&self.property_type),
            amenity: text(&self.amenity),
            facilities: self
                .facilities
                .as_deref()
                .map(|list| {
                    list.split(',')
                        .filter_map(|f| selected(Some(f)))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

/// GET /api/hotel
pub async fn list_hotels(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HotelQuery>,
) -> AppResult<Json<Vec<Hotel>>> {
    let hotels = state.hotel_repo.list_hotels().await?;
    let criteria = query.into_criteria()?;
    if criteria == HotelCriteria::default() {
        return Ok(Json(hotels));
    }
    Ok(Json(select_hotels(&hotels, &criteria)))
}

/// GET /api/hotel/{id}
pub async fn get_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Hotel>> {
    state
        .hotel_repo
        .get_hotel(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Hotel not found".to_string()))
}

/// GET /api/hotel/user/{id}
/// The hotel operated by account `id`.
pub async fn get_hotel_by_owner(
    State(state): State<AppState>,
    AppPath(owner): AppPath<Uuid>,
) -> AppResult<Json<Hotel>> {
    state
        .hotel_repo
        .find_hotel_by_owner(owner)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Hotel not found".to_string()))
}

/// POST /api/hotel
pub async fn create_hotel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<HotelRequest>,
) -> AppResult<(StatusCode, Json<Hotel>)> {
    let hotel = req.into_hotel(claims.sub)?;
    state.hotel_repo.create_hotel(&hotel).await?;
    tracing::info!("Hotel created: {} by {}", hotel.id, claims.sub);
    Ok((StatusCode::CREATED, Json(hotel)))
}
