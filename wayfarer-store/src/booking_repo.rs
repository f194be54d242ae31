use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wayfarer_core::repository::{BookingRepository, StoreError, StoreResult};
use wayfarer_core::{Booking, BookingStatus, ResourceKind};

use crate::db_error;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, guest_name, kind, resource_id, start_date, end_date, \
     amount, room_count, pickup, dropoff, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    guest_name: String,
    kind: String,
    resource_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    amount: f64,
    room_count: Option<i32>,
    pickup: Option<String>,
    dropoff: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let kind: ResourceKind = row
            .kind
            .parse()
            .map_err(|_| StoreError::backend(format!("bad booking kind '{}' on {}", row.kind, row.id)))?;
        let status: BookingStatus = row
            .status
            .parse()
            .map_err(|_| StoreError::backend(format!("bad booking status '{}' on {}", row.status, row.id)))?;

        Ok(Booking {
            id: row.id,
            user: row.user_id,
            guest_name: row.guest_name,
            kind,
            resource: row.resource_id,
            start_date: row.start_date,
            end_date: row.end_date,
            amount: row.amount,
            room_count: row.room_count,
            pickup: row.pickup,
            dropoff: row.dropoff,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_bookings(rows: Vec<BookingRow>) -> StoreResult<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn create_booking(&self, booking: &Booking) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO bookings ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            BOOKING_COLUMNS
        ))
        .bind(booking.id)
        .bind(booking.user)
        .bind(&booking.guest_name)
        .bind(booking.kind.as_str())
        .bind(booking.resource)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.amount)
        .bind(booking.room_count)
        .bind(&booking.pickup)
        .bind(&booking.dropoff)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_by_user(&self, kind: ResourceKind, user: Uuid) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE kind = $1 AND user_id = $2 ORDER BY created_at",
            BOOKING_COLUMNS
        ))
        .bind(kind.as_str())
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        into_bookings(rows)
    }

    async fn list_by_resource(&self, kind: ResourceKind, resource: Uuid) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE kind = $1 AND resource_id = $2 ORDER BY created_at",
            BOOKING_COLUMNS
        ))
        .bind(kind.as_str())
        .bind(resource)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        into_bookings(rows)
    }

    async fn update_booking(&self, booking: &Booking) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE bookings SET
                start_date = $2, end_date = $3, amount = $4, room_count = $5,
                pickup = $6, dropoff = $7, status = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(booking.id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.amount)
        .bind(booking.room_count)
        .bind(&booking.pickup)
        .bind(&booking.dropoff)
        .bind(booking.status.as_str())
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
