use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use wayfarer_core::repository::{HotelRepository, StoreResult};
use wayfarer_core::Hotel;

use crate::db_error;

pub struct StoreHotelRepository {
    pool: PgPool,
}

impl StoreHotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const HOTEL_COLUMNS: &str = "id, owner_id, name, location, price, star, rating, property_type, \
     amenities, facilities, created_at";

#[derive(sqlx::FromRow)]
struct HotelRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    location: String,
    price: f64,
    star: f64,
    rating: f64,
    property_type: String,
    amenities: Json<Vec<String>>,
    facilities: Json<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl From<HotelRow> for Hotel {
    fn from(row: HotelRow) -> Self {
        Hotel {
            id: row.id,
            owner: row.owner_id,
            name: row.name,
            location: row.location,
            price: row.price,
            star: row.star,
            rating: row.rating,
            property_type: row.property_type,
            amenities: row.amenities.0,
            facilities: row.facilities.0,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl HotelRepository for StoreHotelRepository {
    async fn list_hotels(&self) -> StoreResult<Vec<Hotel>> {
        let rows = sqlx::query_as::<_, HotelRow>(&format!(
            "SELECT {} FROM hotels ORDER BY created_at",
            HOTEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Hotel::from).collect())
    }

    async fn get_hotel(&self, id: Uuid) -> StoreResult<Option<Hotel>> {
        let row = sqlx::query_as::<_, HotelRow>(&format!(
            "SELECT {} FROM hotels WHERE id = $1",
            HOTEL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Hotel::from))
    }

    async fn find_hotel_by_owner(&self, owner: Uuid) -> StoreResult<Option<Hotel>> {
        let row = sqlx::query_as::<_, HotelRow>(&format!(
            "SELECT {} FROM hotels WHERE owner_id = $1 ORDER BY created_at LIMIT 1",
            HOTEL_COLUMNS
        ))
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Hotel::from))
    }

    async fn create_hotel(&self, hotel: &Hotel) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO hotels ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            HOTEL_COLUMNS
        ))
        .bind(hotel.id)
        .bind(hotel.owner)
        .bind(&hotel.name)
        .bind(&hotel.location)
        .bind(hotel.price)
        .bind(hotel.star)
        .bind(hotel.rating)
        .bind(&hotel.property_type)
        .bind(Json(&hotel.amenities))
        .bind(Json(&hotel.facilities))
        .bind(hotel.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
