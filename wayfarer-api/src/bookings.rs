use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use wayfarer_core::search::{select_bookings, BookingCriteria};
use wayfarer_core::{Booking, BookingRequest, BookingStatus, ResourceKind};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::{ensure_self, guarded, Claims, Role, HOTEL_STAFF, USER};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let guests = Router::new()
        .route("/api/booking/create", post(create_booking))
        .route("/api/booking/user/{id}", get(list_user_bookings));

    let signed_in = Router::new().route("/api/booking/{id}", get(get_booking));

    let staff = Router::new()
        .route("/api/booking/hotel/{id}", get(list_hotel_bookings))
        .route("/api/booking/update/status/{id}", put(update_booking_status));

    guarded(state, USER, guests)
        .merge(guarded(state, &[], signed_in))
        .merge(guarded(state, HOTEL_STAFF, staff))
}

/// Dashboard controls: free-text search, status filter and sort order.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

impl DashboardQuery {
    /// Applies the dashboard criteria; with none given the list is returned as is.
    pub fn select(&self, bookings: Vec<Booking>) -> AppResult<Vec<Booking>> {
        let criteria = BookingCriteria::from_params(
            self.search.as_deref(),
            self.status.as_deref(),
            self.sort.as_deref(),
        )?;
        if criteria.is_empty() {
            return Ok(bookings);
        }
        Ok(select_bookings(&bookings, &criteria))
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub(crate) fn booking_not_found() -> AppError {
    AppError::NotFoundError("Booking not found".to_string())
}

pub(crate) async fn load_booking(state: &AppState, id: Uuid, kind: ResourceKind) -> AppResult<Booking> {
    state
        .booking_repo
        .get_booking(id)
        .await?
        .filter(|b| b.kind == kind)
        .ok_or_else(booking_not_found)
}

/// Admins manage every hotel; hotel accounts only the hotel they operate.
async fn ensure_hotel_staff(state: &AppState, claims: &Claims, hotel_id: Uuid) -> AppResult<()> {
    if claims.is(Role::Admin) {
        return Ok(());
    }
    let hotel = state
        .hotel_repo
        .get_hotel(hotel_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Hotel not found".to_string()))?;
    if claims.is(Role::Hotel) && hotel.owner == claims.sub {
        return Ok(());
    }
    Err(AppError::AuthorizationError(
        "Not allowed to manage bookings of this hotel".to_string(),
    ))
}

/// POST /api/booking/create
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<BookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    if state.hotel_repo.get_hotel(req.resource).await?.is_none() {
        return Err(AppError::NotFoundError("Hotel not found".to_string()));
    }

    let booking = req.into_booking(ResourceKind::Hotel, claims.sub, claims.name.clone())?;
    state.booking_repo.create_booking(&booking).await?;
    tracing::info!(
        "Hotel booking {} created by {} for hotel {}",
        booking.id,
        claims.sub,
        booking.resource
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/booking/{id}
/// Visible to the guest who made it, the hotel's operator and admins.
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = load_booking(&state, id, ResourceKind::Hotel).await?;
    if booking.user != claims.sub {
        ensure_hotel_staff(&state, &claims, booking.resource).await?;
    }
    Ok(Json(booking))
}

/// GET /api/booking/hotel/{id}?search=&status=&sort=
pub async fn list_hotel_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(hotel_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    ensure_hotel_staff(&state, &claims, hotel_id).await?;
    let bookings = state
        .booking_repo
        .list_by_resource(ResourceKind::Hotel, hotel_id)
        .await?;
    Ok(Json(query.select(bookings)?))
}

/// GET /api/booking/user/{id}
pub async fn list_user_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Booking>>> {
    ensure_self(&claims, user_id)?;
    let bookings = state
        .booking_repo
        .list_by_user(ResourceKind::Hotel, user_id)
        .await?;
    Ok(Json(bookings))
}

/// PUT /api/booking/update/status/{id}
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<StatusUpdate>,
) -> AppResult<Json<Booking>> {
    let mut booking = load_booking(&state, id, ResourceKind::Hotel).await?;
    ensure_hotel_staff(&state, &claims, booking.resource).await?;

    let next: BookingStatus = update.status.parse()?;
    booking.transition(next)?;
    state.booking_repo.update_booking(&booking).await?;
    tracing::info!("Hotel booking {} is now {}", id, booking.status);
    Ok(Json(booking))
}
