pub mod app_config;
pub mod booking_repo;
pub mod category_repo;
pub mod database;
pub mod hotel_repo;
pub mod memory;
pub mod redis_repo;
pub mod tour_repo;

pub use booking_repo::StoreBookingRepository;
pub use category_repo::StoreCategoryRepository;
pub use database::DbClient;
pub use hotel_repo::StoreHotelRepository;
pub use memory::InMemoryStore;
pub use redis_repo::RedisClient;
pub use tour_repo::StoreTourRepository;

use wayfarer_core::repository::StoreError;

/// Maps a sqlx error onto the repository error, surfacing unique-index
/// violations as `Conflict`.
pub(crate) fn db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(db_err.message().to_string());
        }
    }
    StoreError::Backend(Box::new(err))
}
