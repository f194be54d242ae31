use axum::{http::Method, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod cab_bookings;
pub mod categories;
pub mod error;
pub mod extract;
pub mod hotels;
pub mod middleware;
pub mod state;
pub mod tours;

pub use error::{AppError, AppResult};
pub use extract::{AppJson, AppPath, AppQuery};
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let mut router = Router::new()
        .route("/health", get(health))
        .merge(tours::routes(&state))
        .merge(categories::routes(&state))
        .merge(hotels::routes(&state))
        .merge(bookings::routes(&state))
        .merge(cab_bookings::routes(&state));

    if let Some(limiter) = state.rate_limit.clone() {
        router = router.layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
