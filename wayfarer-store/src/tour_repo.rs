use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use wayfarer_core::repository::{StoreResult, TourRepository};
use wayfarer_core::{Tour, TourPlanDay};

use crate::db_error;

pub struct StoreTourRepository {
    pool: PgPool,
}

impl StoreTourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TOUR_COLUMNS: &str = "id, name, tour_type, description, image, price, rating, reviews, \
     location, duration, photos, inclusions, tour_plan, available_from, available_till, \
     featured, category, types, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TourRow {
    id: Uuid,
    name: Option<String>,
    tour_type: Option<String>,
    description: Option<String>,
    image: Option<String>,
    price: Option<f64>,
    rating: Option<f64>,
    reviews: Option<i32>,
    location: Option<String>,
    duration: Option<String>,
    photos: Json<Vec<String>>,
    inclusions: Json<Vec<String>>,
    tour_plan: Json<Vec<TourPlanDay>>,
    available_from: Option<DateTime<Utc>>,
    available_till: Option<DateTime<Utc>>,
    featured: bool,
    category: Option<String>,
    types: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TourRow> for Tour {
    fn from(row: TourRow) -> Self {
        Tour {
            id: row.id,
            name: row.name,
            tour_type: row.tour_type,
            description: row.description,
            image: row.image,
            price: row.price,
            rating: row.rating,
            reviews: row.reviews,
            location: row.location,
            duration: row.duration,
            photos: row.photos.0,
            inclusions: row.inclusions.0,
            tour_plan: row.tour_plan.0,
            available_from: row.available_from,
            available_till: row.available_till,
            featured: row.featured,
            category: row.category,
            types: row.types.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TourRepository for StoreTourRepository {
    async fn list_tours(&self) -> StoreResult<Vec<Tour>> {
        let rows = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {} FROM tours ORDER BY created_at",
            TOUR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Tour::from).collect())
    }

    async fn get_tour(&self, id: Uuid) -> StoreResult<Option<Tour>> {
        let row = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {} FROM tours WHERE id = $1",
            TOUR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Tour::from))
    }

    async fn create_tour(&self, tour: &Tour) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO tours ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)",
            TOUR_COLUMNS
        ))
        .bind(tour.id)
        .bind(&tour.name)
        .bind(&tour.tour_type)
        .bind(&tour.description)
        .bind(&tour.image)
        .bind(tour.price)
        .bind(tour.rating)
        .bind(tour.reviews)
        .bind(&tour.location)
        .bind(&tour.duration)
        .bind(Json(&tour.photos))
        .bind(Json(&tour.inclusions))
        .bind(Json(&tour.tour_plan))
        .bind(tour.available_from)
        .bind(tour.available_till)
        .bind(tour.featured)
        .bind(&tour.category)
        .bind(Json(&tour.types))
        .bind(tour.created_at)
        .bind(tour.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn replace_tour(&self, tour: &Tour) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE tours SET
                name = $2, tour_type = $3, description = $4, image = $5, price = $6,
                rating = $7, reviews = $8, location = $9, duration = $10, photos = $11,
                inclusions = $12, tour_plan = $13, available_from = $14, available_till = $15,
                featured = $16, category = $17, types = $18, updated_at = $19
            WHERE id = $1
            "#,
        )
        .bind(tour.id)
        .bind(&tour.name)
        .bind(&tour.tour_type)
        .bind(&tour.description)
        .bind(&tour.image)
        .bind(tour.price)
        .bind(tour.rating)
        .bind(tour.reviews)
        .bind(&tour.location)
        .bind(&tour.duration)
        .bind(Json(&tour.photos))
        .bind(Json(&tour.inclusions))
        .bind(Json(&tour.tour_plan))
        .bind(tour.available_from)
        .bind(tour.available_till)
        .bind(tour.featured)
        .bind(&tour.category)
        .bind(Json(&tour.types))
        .bind(tour.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete_tour(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn retag_tours(
        &self,
        old_category: &str,
        category: &str,
        description: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE tours SET category = $2, description = $3, updated_at = NOW() WHERE category = $1",
        )
        .bind(old_category)
        .bind(category)
        .bind(description)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_tours_by_category(&self, category: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tours WHERE category = $1")
            .bind(category)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
