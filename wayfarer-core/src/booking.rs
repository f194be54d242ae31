use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::de::flexible_date;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Pending bookings may be confirmed or cancelled, confirmed ones only cancelled.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::ValidationError(format!("Unknown booking status: {}", other))),
        }
    }
}

/// What a booking reserves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Hotel,
    Cab,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Hotel => "hotel",
            ResourceKind::Cab => "cab",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotel" => Ok(ResourceKind::Hotel),
            "cab" => Ok(ResourceKind::Cab),
            other => Err(CoreError::ValidationError(format!("Unknown resource kind: {}", other))),
        }
    }
}

/// A reservation linking a user to a hotel or cab over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub guest_name: String,
    pub kind: ResourceKind,
    pub resource: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub amount: f64,
    pub room_count: Option<i32>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Moves the booking to `next`, refusing transitions out of terminal states.
    pub fn transition(&mut self, next: BookingStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn apply_update(&mut self, update: BookingUpdate) -> CoreResult<()> {
        if self.status == BookingStatus::Cancelled {
            return Err(CoreError::ValidationError(
                "Cancelled bookings cannot be changed".to_string(),
            ));
        }

        let start = update.start_date.unwrap_or(self.start_date);
        let end = update.end_date.unwrap_or(self.end_date);
        check_range(start, end)?;
        if let Some(amount) = update.amount {
            check_amount(amount)?;
            self.amount = amount;
        }

        self.start_date = start;
        self.end_date = end;
        if update.pickup.is_some() {
            self.pickup = update.pickup;
        }
        if update.dropoff.is_some() {
            self.dropoff = update.dropoff;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Short label shown in dashboards and matched by free-text search.
    pub fn room_label(&self) -> Option<String> {
        self.room_count.map(|n| format!("{} rooms", n))
    }

    pub fn slot(&self) -> BookedSlot {
        BookedSlot {
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
        }
    }
}

/// Availability view of a booking that does not reveal who made it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub resource: Uuid,
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub room_count: Option<i32>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
}

impl BookingRequest {
    pub fn into_booking(self, kind: ResourceKind, user: Uuid, guest_name: String) -> CoreResult<Booking> {
        let (start_date, end_date, amount) = match (self.start_date, self.end_date, self.amount) {
            (Some(start), Some(end), Some(amount)) => (start, end, amount),
            _ => {
                return Err(CoreError::ValidationError(
                    "startDate, endDate and amount are required".to_string(),
                ))
            }
        };
        check_range(start_date, end_date)?;
        check_amount(amount)?;

        let room_count = match kind {
            ResourceKind::Hotel => match self.room_count {
                Some(n) if n >= 1 => Some(n),
                _ => {
                    return Err(CoreError::ValidationError(
                        "roomCount must be at least 1".to_string(),
                    ))
                }
            },
            ResourceKind::Cab => None,
        };

        let now = Utc::now();
        Ok(Booking {
            id: Uuid::new_v4(),
            user,
            guest_name,
            kind,
            resource: self.resource,
            start_date,
            end_date,
            amount,
            room_count,
            pickup: self.pickup,
            dropoff: self.dropoff,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
}

fn check_range(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<()> {
    if start >= end {
        return Err(CoreError::ValidationError(
            "startDate must be before endDate".to_string(),
        ));
    }
    Ok(())
}

fn check_amount(amount: f64) -> CoreResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::ValidationError("amount must be a non-negative number".to_string()));
    }
    Ok(())
}
