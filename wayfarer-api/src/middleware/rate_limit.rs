use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wayfarer_store::redis_repo::rate_limit_key;

use crate::state::RateLimiter;

/// Fixed-window limit per client address. Redis errors let the request through.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let key = rate_limit_key(&client, chrono::Utc::now().timestamp(), limiter.window_seconds);

    match limiter
        .redis
        .check_rate_limit(&key, limiter.requests, limiter.window_seconds)
        .await
    {
        Ok(true) => next.run(req).await,
        Ok(false) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "message": "Rate limit exceeded" })),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!("Rate limiter unavailable, failing open: {}", err);
            next.run(req).await
        }
    }
}
