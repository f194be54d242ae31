use std::sync::Arc;

use wayfarer_catalog::CatalogService;
use wayfarer_core::repository::{BookingRepository, HotelRepository};
use wayfarer_store::{InMemoryStore, RedisClient};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

/// Fixed-window request limit backed by Redis.
#[derive(Clone)]
pub struct RateLimiter {
    pub redis: Arc<RedisClient>,
    pub requests: i64,
    pub window_seconds: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub hotel_repo: Arc<dyn HotelRepository>,
    pub auth: AuthConfig,
    pub rate_limit: Option<RateLimiter>,
}

impl AppState {
    /// Every repository served from one process-local store.
    pub fn in_memory(secret: impl Into<String>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            catalog: Arc::new(CatalogService::new(store.clone(), store.clone())),
            booking_repo: store.clone(),
            hotel_repo: store,
            auth: AuthConfig {
                secret: secret.into(),
            },
            rate_limit: None,
        }
    }
}
