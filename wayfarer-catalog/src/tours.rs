use tracing::info;
use uuid::Uuid;
use wayfarer_core::{Tour, TourPayload};

use crate::{CatalogError, CatalogResult, CatalogService};

impl CatalogService {
    pub async fn list_tours(&self) -> CatalogResult<Vec<Tour>> {
        Ok(self.tours.list_tours().await?)
    }

    pub async fn get_tour(&self, id: Uuid) -> CatalogResult<Tour> {
        self.tours
            .get_tour(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Tour not found".to_string()))
    }

    /// Direct creation: every required field must be present.
    pub async fn create_tour(&self, payload: TourPayload) -> CatalogResult<Tour> {
        let tour = payload.into_tour()?;
        self.tours.create_tour(&tour).await?;
        info!("Tour created: {} ({:?})", tour.id, tour.name);
        Ok(tour)
    }

    /// Full replacement of a tour's tracked fields.
    pub async fn update_tour(&self, id: Uuid, payload: TourPayload) -> CatalogResult<Tour> {
        let existing = self.get_tour(id).await?;
        let updated = payload.overwrite(existing);
        self.tours.replace_tour(&updated).await?;
        info!("Tour updated: {}", id);
        Ok(updated)
    }

    pub async fn delete_tour(&self, id: Uuid) -> CatalogResult<()> {
        if !self.tours.delete_tour(id).await? {
            return Err(CatalogError::NotFound("Tour not found".to_string()));
        }
        info!("Tour removed: {}", id);
        Ok(())
    }
}
