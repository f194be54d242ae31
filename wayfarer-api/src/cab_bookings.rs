use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use wayfarer_core::{BookedSlot, Booking, BookingRequest, BookingStatus, BookingUpdate, ResourceKind};

use crate::bookings::{load_booking, DashboardQuery, StatusUpdate};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::{ensure_self, guarded, Claims, Role, CAB_EDITORS, CAB_STAFF, USER};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let signed_in = Router::new()
        .route("/api/cabBooking/create", post(create_cab_booking))
        .route("/api/cabBooking/cabBook/{id}", get(list_booked_slots));

    let staff = Router::new()
        .route("/api/cabBooking/{id}", get(get_cab_booking))
        .route("/api/cabBooking/cab/{id}", get(list_cab_bookings))
        .route("/api/cabBooking/update/status/{id}", put(update_cab_booking_status));

    let editors = Router::new().route("/api/cabBooking/update/{id}", put(update_cab_booking));

    let riders = Router::new().route("/api/cabBooking/user/{id}", get(list_user_cab_bookings));

    guarded(state, &[], signed_in)
        .merge(guarded(state, CAB_STAFF, staff))
        .merge(guarded(state, CAB_EDITORS, editors))
        .merge(guarded(state, USER, riders))
}

/// Cab accounts see only bookings of their own cab; admins see all.
fn ensure_cab_staff(claims: &Claims, cab_id: Uuid) -> AppResult<()> {
    if claims.is(Role::Admin) || (claims.is(Role::Cab) && claims.sub == cab_id) {
        return Ok(());
    }
    Err(AppError::AuthorizationError(
        "Not allowed to manage bookings of this cab".to_string(),
    ))
}

/// POST /api/cabBooking/create
/// `resource` is the cab operator's account id.
pub async fn create_cab_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<BookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = req.into_booking(ResourceKind::Cab, claims.sub, claims.name.clone())?;
    state.booking_repo.create_booking(&booking).await?;
    tracing::info!(
        "Cab booking {} created by {} for cab {}",
        booking.id,
        claims.sub,
        booking.resource
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/cabBooking/{id}
pub async fn get_cab_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = load_booking(&state, id, ResourceKind::Cab).await?;
    ensure_cab_staff(&claims, booking.resource)?;
    Ok(Json(booking))
}

/// GET /api/cabBooking/cab/{id}?search=&status=&sort=
pub async fn list_cab_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(cab_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    ensure_cab_staff(&claims, cab_id)?;
    let bookings = state
        .booking_repo
        .list_by_resource(ResourceKind::Cab, cab_id)
        .await?;
    Ok(Json(query.select(bookings)?))
}

/// GET /api/cabBooking/cabBook/{id}
/// When the cab is taken, without saying by whom.
pub async fn list_booked_slots(
    State(state): State<AppState>,
    AppPath(cab_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<BookedSlot>>> {
    let bookings = state
        .booking_repo
        .list_by_resource(ResourceKind::Cab, cab_id)
        .await?;
    Ok(Json(bookings.iter().map(Booking::slot).collect()))
}

/// PUT /api/cabBooking/update/{id}
pub async fn update_cab_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    let mut booking = load_booking(&state, id, ResourceKind::Cab).await?;
    match claims.role {
        Role::User => ensure_self(&claims, booking.user)?,
        _ => ensure_cab_staff(&claims, booking.resource)?,
    }

    booking.apply_update(update)?;
    state.booking_repo.update_booking(&booking).await?;
    tracing::info!("Cab booking {} updated by {}", id, claims.sub);
    Ok(Json(booking))
}

/// PUT /api/cabBooking/update/status/{id}
pub async fn update_cab_booking_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<StatusUpdate>,
) -> AppResult<Json<Booking>> {
    let mut booking = load_booking(&state, id, ResourceKind::Cab).await?;
    ensure_cab_staff(&claims, booking.resource)?;

    let next: BookingStatus = update.status.parse()?;
    booking.transition(next)?;
    state.booking_repo.update_booking(&booking).await?;
    tracing::info!("Cab booking {} is now {}", id, booking.status);
    Ok(Json(booking))
}

/// GET /api/cabBooking/user/{id}
pub async fn list_user_cab_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Booking>>> {
    ensure_self(&claims, user_id)?;
    let bookings = state
        .booking_repo
        .list_by_user(ResourceKind::Cab, user_id)
        .await?;
    Ok(Json(bookings))
}
