use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;
use wayfarer_core::repository::StoreError;
use wayfarer_core::{CategoryPayload, Tour, TourCategory};

use crate::{CatalogError, CatalogResult, CatalogService};

const DUPLICATE: &str = "Category already exists";

fn category_not_found() -> CatalogError {
    CatalogError::NotFound("Category not found".to_string())
}

fn duplicate_on_conflict(err: StoreError) -> CatalogError {
    match err {
        StoreError::Conflict(_) => CatalogError::Conflict(DUPLICATE.to_string()),
        other => CatalogError::Store(other),
    }
}

impl CatalogService {
    pub async fn list_categories(&self) -> CatalogResult<Vec<TourCategory>> {
        Ok(self.categories.list_categories().await?)
    }

    pub async fn get_category(&self, id: Uuid) -> CatalogResult<TourCategory> {
        self.categories
            .get_category(id)
            .await?
            .ok_or_else(category_not_found)
    }

    /// Creates a category together with its companion tour.
    ///
    /// The two writes are not atomic. If the tour write fails the category is
    /// deleted again (once, without verification) and `CompanionTour` is
    /// returned. The duplicate check and the insert are separate reads and
    /// writes; a backend with a unique index reports a racing duplicate as
    /// `Conflict`.
    pub async fn create_category(&self, payload: CategoryPayload) -> CatalogResult<TourCategory> {
        let (name, description) = payload.validate()?;

        if self.categories.find_category_by_name(&name).await?.is_some() {
            return Err(CatalogError::Conflict(DUPLICATE.to_string()));
        }

        let category = TourCategory::new(name, description);
        self.categories
            .create_category(&category)
            .await
            .map_err(duplicate_on_conflict)?;

        let companion = Tour::companion(&category.category, &category.description);
        if let Err(err) = self.tours.create_tour(&companion).await {
            warn!(
                "Companion tour for category '{}' failed, rolling back: {}",
                category.category, err
            );
            if let Err(rollback_err) = self.categories.delete_category(category.id).await {
                error!(
                    "Rollback of category {} failed, category left without tour: {}",
                    category.id, rollback_err
                );
            }
            return Err(CatalogError::CompanionTour(err));
        }

        info!("Category created: {} ({})", category.category, category.id);
        Ok(category)
    }

    /// Renames a category and re-tags every tour filed under the old name.
    ///
    /// Rename and re-tag are independent writes. When the re-tag fails the
    /// rename stays and the error is returned; tours keep the stale name.
    pub async fn update_category(&self, id: Uuid, payload: CategoryPayload) -> CatalogResult<TourCategory> {
        let mut category = self.get_category(id).await?;
        let (name, description) = payload.validate()?;

        if name != category.category {
            if let Some(other) = self.categories.find_category_by_name(&name).await? {
                if other.id != id {
                    return Err(CatalogError::Conflict(DUPLICATE.to_string()));
                }
            }
        }

        let old_name = std::mem::replace(&mut category.category, name);
        category.description = description;
        category.updated_at = Utc::now();
        self.categories
            .update_category(&category)
            .await
            .map_err(duplicate_on_conflict)?;

        let retagged = self
            .tours
            .retag_tours(&old_name, &category.category, &category.description)
            .await
            .map_err(|err| {
                error!(
                    "Category {} renamed but re-tagging tours from '{}' failed: {}",
                    id, old_name, err
                );
                err
            })?;

        info!(
            "Category {} updated ('{}' -> '{}'), {} tours re-tagged",
            id, old_name, category.category, retagged
        );
        Ok(category)
    }

    /// Deletes every tour in the category, then the category. Returns the
    /// number of tours removed.
    pub async fn delete_category(&self, id: Uuid) -> CatalogResult<u64> {
        let category = self.get_category(id).await?;

        let removed = self.tours.delete_tours_by_category(&category.category).await?;
        self.categories.delete_category(category.id).await?;

        info!(
            "Category {} ('{}') removed with {} tours",
            id, category.category, removed
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use wayfarer_core::repository::{StoreResult, TourRepository};
    use wayfarer_core::TourPayload;
    use wayfarer_store::memory::InMemoryStore;

    /// Tour repository whose writes fail, reads pass through.
    struct BrokenTourWrites(Arc<InMemoryStore>);

    #[async_trait]
    impl TourRepository for BrokenTourWrites {
        async fn list_tours(&self) -> StoreResult<Vec<Tour>> {
            self.0.list_tours().await
        }
        async fn get_tour(&self, id: Uuid) -> StoreResult<Option<Tour>> {
            self.0.get_tour(id).await
        }
        async fn create_tour(&self, _tour: &Tour) -> StoreResult<()> {
            Err(StoreError::backend("disk full"))
        }
        async fn replace_tour(&self, tour: &Tour) -> StoreResult<()> {
            self.0.replace_tour(tour).await
        }
        async fn delete_tour(&self, id: Uuid) -> StoreResult<bool> {
            self.0.delete_tour(id).await
        }
        async fn retag_tours(&self, _old: &str, _category: &str, _description: &str) -> StoreResult<u64> {
            Err(StoreError::backend("disk full"))
        }
        async fn delete_tours_by_category(&self, category: &str) -> StoreResult<u64> {
            self.0.delete_tours_by_category(category).await
        }
    }

    fn payload(category: &str, description: &str) -> CategoryPayload {
        CategoryPayload {
            category: Some(category.to_string()),
            description: Some(description.to_string()),
        }
    }

    fn service() -> (CatalogService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (CatalogService::new(store.clone(), store.clone()), store)
    }

    /// Files an extra tour under `category` straight through the store.
    async fn file_tour(store: &InMemoryStore, category: &str) -> Uuid {
        let partial = TourPayload {
            name: Some(format!("{} tour", category)),
            ..TourPayload::default()
        };
        let tour = partial.overwrite(Tour::companion(category, "imported"));
        store.create_tour(&tour).await.unwrap();
        tour.id
    }

    #[tokio::test]
    async fn test_create_pairs_category_with_empty_tour() {
        let (svc, _) = service();
        let created = svc.create_category(payload("Beach", "Sun and sand")).await.unwrap();

        let fetched = svc.get_category(created.id).await.unwrap();
        assert_eq!(fetched.category, "Beach");
        assert_eq!(fetched.description, "Sun and sand");

        let tours = svc.list_tours().await.unwrap();
        assert_eq!(tours.len(), 1);
        assert_eq!(tours[0].category.as_deref(), Some("Beach"));
        assert_eq!(tours[0].description.as_deref(), Some("Sun and sand"));
        assert!(tours[0].types.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts_without_side_effects() {
        let (svc, _) = service();
        svc.create_category(payload("Beach", "first")).await.unwrap();

        let result = svc.create_category(payload("Beach", "second")).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));

        let categories = svc.list_categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].description, "first");
        assert_eq!(svc.list_tours().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let (svc, _) = service();
        let result = svc
            .create_category(CategoryPayload {
                category: Some("Beach".to_string()),
                description: None,
            })
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_failed_companion_rolls_back_category() {
        let store = Arc::new(InMemoryStore::new());
        let svc = CatalogService::new(Arc::new(BrokenTourWrites(store.clone())), store.clone());

        let result = svc.create_category(payload("Desert", "Dunes")).await;
        assert!(matches!(result, Err(CatalogError::CompanionTour(_))));

        let healthy = CatalogService::new(store.clone(), store);
        assert!(healthy.list_categories().await.unwrap().is_empty());
        assert!(healthy.list_tours().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_retags_every_tour() {
        let (svc, store) = service();
        let category = svc.create_category(payload("Hills", "Cool")).await.unwrap();
        let extra = file_tour(&store, "Hills").await;

        let renamed = svc
            .update_category(category.id, payload("Mountains", "Colder"))
            .await
            .unwrap();
        assert_eq!(renamed.category, "Mountains");

        let tours = svc.list_tours().await.unwrap();
        assert_eq!(tours.len(), 2);
        for tour in &tours {
            assert_eq!(tour.category.as_deref(), Some("Mountains"));
            assert_eq!(tour.description.as_deref(), Some("Colder"));
        }
        assert!(tours.iter().any(|t| t.id == extra));
    }

    #[tokio::test]
    async fn test_rename_keeps_category_when_retag_fails() {
        let store = Arc::new(InMemoryStore::new());
        let healthy = CatalogService::new(store.clone(), store.clone());
        let category = healthy.create_category(payload("Hills", "Cool")).await.unwrap();

        let broken = CatalogService::new(Arc::new(BrokenTourWrites(store.clone())), store.clone());
        let result = broken.update_category(category.id, payload("Mountains", "Colder")).await;
        assert!(matches!(result, Err(CatalogError::Store(_))));

        // the rename is not undone; tours still carry the old name
        assert_eq!(healthy.get_category(category.id).await.unwrap().category, "Mountains");
        let tours = healthy.list_tours().await.unwrap();
        assert_eq!(tours[0].category.as_deref(), Some("Hills"));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let (svc, _) = service();
        svc.create_category(payload("Beach", "a")).await.unwrap();
        let hills = svc.create_category(payload("Hills", "b")).await.unwrap();

        let result = svc.update_category(hills.id, payload("Beach", "c")).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));

        // same name, new description is fine
        svc.update_category(hills.id, payload("Hills", "d")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_cascades_to_all_tours() {
        let (svc, store) = service();
        let beach = svc.create_category(payload("Beach", "Sun")).await.unwrap();
        file_tour(&store, "Beach").await;
        let other = svc.create_category(payload("Hills", "Cool")).await.unwrap();

        let removed = svc.delete_category(beach.id).await.unwrap();
        assert_eq!(removed, 2);

        assert!(matches!(
            svc.get_category(beach.id).await,
            Err(CatalogError::NotFound(_))
        ));
        let remaining = svc.list_tours().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category.as_deref(), Some(other.category.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let (svc, _) = service();
        let id = Uuid::new_v4();
        assert!(matches!(svc.delete_category(id).await, Err(CatalogError::NotFound(_))));
        assert!(matches!(
            svc.update_category(id, payload("X", "Y")).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
