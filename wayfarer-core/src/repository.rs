use async_trait::async_trait;
use uuid::Uuid;

use crate::{Booking, Hotel, ResourceKind, Tour, TourCategory};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store failure: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        let message: String = message.into();
        StoreError::Backend(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for tour documents
#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn list_tours(&self) -> StoreResult<Vec<Tour>>;

    async fn get_tour(&self, id: Uuid) -> StoreResult<Option<Tour>>;

    async fn create_tour(&self, tour: &Tour) -> StoreResult<()>;

    /// Stores `tour` in place of the document with the same id.
    async fn replace_tour(&self, tour: &Tour) -> StoreResult<()>;

    /// Returns false when no tour had that id.
    async fn delete_tour(&self, id: Uuid) -> StoreResult<bool>;

    /// Sets category and description on every tour filed under `old_category`.
    async fn retag_tours(
        &self,
        old_category: &str,
        category: &str,
        description: &str,
    ) -> StoreResult<u64>;

    async fn delete_tours_by_category(&self, category: &str) -> StoreResult<u64>;
}

/// Repository trait for tour categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_categories(&self) -> StoreResult<Vec<TourCategory>>;

    async fn get_category(&self, id: Uuid) -> StoreResult<Option<TourCategory>>;

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<TourCategory>>;

    async fn create_category(&self, category: &TourCategory) -> StoreResult<()>;

    async fn update_category(&self, category: &TourCategory) -> StoreResult<()>;

    async fn delete_category(&self, id: Uuid) -> StoreResult<bool>;
}

/// Repository trait for hotel and cab bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &Booking) -> StoreResult<()>;

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    async fn list_by_user(&self, kind: ResourceKind, user: Uuid) -> StoreResult<Vec<Booking>>;

    async fn list_by_resource(&self, kind: ResourceKind, resource: Uuid) -> StoreResult<Vec<Booking>>;

    async fn update_booking(&self, booking: &Booking) -> StoreResult<()>;
}

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn list_hotels(&self) -> StoreResult<Vec<Hotel>>;

    async fn get_hotel(&self, id: Uuid) -> StoreResult<Option<Hotel>>;

    async fn find_hotel_by_owner(&self, owner: Uuid) -> StoreResult<Option<Hotel>>;

    async fn create_hotel(&self, hotel: &Hotel) -> StoreResult<()>;
}
