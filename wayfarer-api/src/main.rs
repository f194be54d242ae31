use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer_api::{
    app,
    state::{AppState, AuthConfig, RateLimiter},
};
use wayfarer_catalog::CatalogService;
use wayfarer_store::app_config::{Config, StorageBackend};
use wayfarer_store::{
    DbClient, RedisClient, StoreBookingRepository, StoreCategoryRepository, StoreHotelRepository,
    StoreTourRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Wayfarer API on port {}", config.server.port);

    let mut app_state = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            AppState::in_memory(config.auth.jwt_secret.clone())
        }
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .context("storage.backend = postgres needs a [database] section")?;
            let db = DbClient::new(&db_config.url, db_config.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;

            let pool = db.pool.clone();
            AppState {
                catalog: Arc::new(CatalogService::new(
                    Arc::new(StoreTourRepository::new(pool.clone())),
                    Arc::new(StoreCategoryRepository::new(pool.clone())),
                )),
                booking_repo: Arc::new(StoreBookingRepository::new(pool.clone())),
                hotel_repo: Arc::new(StoreHotelRepository::new(pool)),
                auth: AuthConfig {
                    secret: config.auth.jwt_secret.clone(),
                },
                rate_limit: None,
            }
        }
    };

    if let Some(redis_config) = &config.redis {
        let redis = RedisClient::new(&redis_config.url)
            .await
            .context("Failed to create Redis client")?;
        app_state.rate_limit = Some(RateLimiter {
            redis: Arc::new(redis),
            requests: config.rate_limit.requests,
            window_seconds: config.rate_limit.window_seconds,
        });
        tracing::info!(
            "Rate limiting at {} requests per {}s",
            config.rate_limit.requests,
            config.rate_limit.window_seconds
        );
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
