//! In-memory implementation of every repository trait.
//!
//! Maps are guarded by `tokio::sync::RwLock`: reads take the read lock,
//! mutations the write lock. Each call is atomic on its own; nothing spans
//! calls, so multi-step workflows see the same interleavings they would on
//! Postgres. State is lost on restart.
//!
//! Category names are kept unique the way the Postgres unique index keeps
//! them, so racing duplicates surface as `StoreError::Conflict` here too.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use wayfarer_core::repository::{
    BookingRepository, CategoryRepository, HotelRepository, StoreError, StoreResult, TourRepository,
};
use wayfarer_core::{Booking, Hotel, ResourceKind, Tour, TourCategory};

#[derive(Default)]
pub struct InMemoryStore {
    tours: RwLock<HashMap<Uuid, Tour>>,
    categories: RwLock<HashMap<Uuid, TourCategory>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    hotels: RwLock<HashMap<Uuid, Hotel>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Oldest first, ties broken by id so listings are deterministic.
fn in_creation_order<T>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, Uuid),
) -> Vec<T> {
    let mut out: Vec<T> = items.collect();
    out.sort_by_key(|item| key(item));
    out
}

fn duplicate_category(name: &str) -> StoreError {
    StoreError::Conflict(format!("category '{}' already exists", name))
}

#[async_trait]
impl TourRepository for InMemoryStore {
    async fn list_tours(&self) -> StoreResult<Vec<Tour>> {
        let tours = self.tours.read().await;
        Ok(in_creation_order(tours.values().cloned(), |t| (t.created_at, t.id)))
    }

    async fn get_tour(&self, id: Uuid) -> StoreResult<Option<Tour>> {
        Ok(self.tours.read().await.get(&id).cloned())
    }

    async fn create_tour(&self, tour: &Tour) -> StoreResult<()> {
        let mut tours = self.tours.write().await;
        if tours.contains_key(&tour.id) {
            return Err(StoreError::Conflict(format!("tour {} already exists", tour.id)));
        }
        tours.insert(tour.id, tour.clone());
        Ok(())
    }

    async fn replace_tour(&self, tour: &Tour) -> StoreResult<()> {
        let mut tours = self.tours.write().await;
        // a replace of a vanished document is a no-op, as an UPDATE would be
        if let Some(slot) = tours.get_mut(&tour.id) {
            *slot = tour.clone();
        }
        Ok(())
    }

    async fn delete_tour(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tours.write().await.remove(&id).is_some())
    }

    async fn retag_tours(
        &self,
        old_category: &str,
        category: &str,
        description: &str,
    ) -> StoreResult<u64> {
        let mut tours = self.tours.write().await;
        let now = chrono::Utc::now();
        let mut count = 0;
        for tour in tours
            .values_mut()
            .filter(|t| t.category.as_deref() == Some(old_category))
        {
            tour.category = Some(category.to_string());
            tour.description = Some(description.to_string());
            tour.updated_at = now;
            count += 1;
        }
        Ok(count)
    }

    async fn delete_tours_by_category(&self, category: &str) -> StoreResult<u64> {
        let mut tours = self.tours.write().await;
        let before = tours.len();
        tours.retain(|_, t| t.category.as_deref() != Some(category));
        Ok((before - tours.len()) as u64)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<TourCategory>> {
        let categories = self.categories.read().await;
        Ok(in_creation_order(categories.values().cloned(), |c| (c.created_at, c.id)))
    }

    async fn get_category(&self, id: Uuid) -> StoreResult<Option<TourCategory>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<TourCategory>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|c| c.category == name).cloned())
    }

    async fn create_category(&self, category: &TourCategory) -> StoreResult<()> {
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.category == category.category) {
            return Err(duplicate_category(&category.category));
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &TourCategory) -> StoreResult<()> {
        let mut categories = self.categories.write().await;
        if categories
            .values()
            .any(|c| c.id != category.id && c.category == category.category)
        {
            return Err(duplicate_category(&category.category));
        }
        if let Some(slot) = categories.get_mut(&category.id) {
            *slot = category.clone();
        }
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_booking(&self, booking: &Booking) -> StoreResult<()> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(StoreError::Conflict(format!("booking {} already exists", booking.id)));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, kind: ResourceKind, user: Uuid) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(in_creation_order(
            bookings
                .values()
                .filter(|b| b.kind == kind && b.user == user)
                .cloned(),
            |b| (b.created_at, b.id),
        ))
    }

    async fn list_by_resource(&self, kind: ResourceKind, resource: Uuid) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(in_creation_order(
            bookings
                .values()
                .filter(|b| b.kind == kind && b.resource == resource)
                .cloned(),
            |b| (b.created_at, b.id),
        ))
    }

    async fn update_booking(&self, booking: &Booking) -> StoreResult<()> {
        let mut bookings = self.bookings.write().await;
        if let Some(slot) = bookings.get_mut(&booking.id) {
            *slot = booking.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl HotelRepository for InMemoryStore {
    async fn list_hotels(&self) -> StoreResult<Vec<Hotel>> {
        let hotels = self.hotels.read().await;
        Ok(in_creation_order(hotels.values().cloned(), |h| (h.created_at, h.id)))
    }

    async fn get_hotel(&self, id: Uuid) -> StoreResult<Option<Hotel>> {
        Ok(self.hotels.read().await.get(&id).cloned())
    }

    async fn find_hotel_by_owner(&self, owner: Uuid) -> StoreResult<Option<Hotel>> {
        let hotels = self.hotels.read().await;
        Ok(in_creation_order(
            hotels.values().filter(|h| h.owner == owner).cloned(),
            |h| (h.created_at, h.id),
        )
        .into_iter()
        .next())
    }

    async fn create_hotel(&self, hotel: &Hotel) -> StoreResult<()> {
        self.hotels.write().await.insert(hotel.id, hotel.clone());
        Ok(())
    }
}
