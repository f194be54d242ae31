mod de;
pub mod tour;
pub mod booking;
pub mod hotel;
pub mod repository;
pub mod search;

pub use tour::{CategoryPayload, Tour, TourCategory, TourPayload, TourPlanDay};
pub use booking::{BookedSlot, Booking, BookingRequest, BookingStatus, BookingUpdate, ResourceKind};
pub use hotel::{Hotel, HotelRequest};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
