//! Tour catalog workflows: categories with their companion tours, and tour
//! documents themselves.
//!
//! Multi-step operations here are sequences of single-document writes. The
//! only failure that is compensated is the companion tour write during
//! category creation; see [`CatalogService::create_category`].

use std::sync::Arc;

use wayfarer_core::repository::{CategoryRepository, StoreError, TourRepository};
use wayfarer_core::CoreError;

pub mod categories;
pub mod tours;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The companion tour write failed and the new category was removed again.
    #[error("Failed to create package for the new category")]
    CompanionTour(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CoreError> for CatalogError {
    fn from(err: CoreError) -> Self {
        CatalogError::Validation(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Entry point for catalog operations, shared by all request handlers.
#[derive(Clone)]
pub struct CatalogService {
    tours: Arc<dyn TourRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl CatalogService {
    pub fn new(tours: Arc<dyn TourRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { tours, categories }
    }
}
