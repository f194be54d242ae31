use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Account of the hotel operator.
    pub owner: Uuid,
    pub name: String,
    pub location: String,
    /// Nightly price.
    pub price: f64,
    /// Star classification, may be fractional (e.g. 3.5).
    pub star: f64,
    /// Average guest rating out of 5.
    pub rating: f64,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRequest {
    pub name: String,
    pub location: String,
    pub price: f64,
    pub star: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl HotelRequest {
    pub fn into_hotel(self, owner: Uuid) -> CoreResult<Hotel> {
        if self.name.trim().is_empty() || self.location.trim().is_empty() {
            return Err(CoreError::ValidationError("name and location are required".to_string()));
        }
        if self.price < 0.0 {
            return Err(CoreError::ValidationError("price must not be negative".to_string()));
        }
        if !(0.0..=5.0).contains(&self.star) || !(0.0..=5.0).contains(&self.rating) {
            return Err(CoreError::ValidationError("star and rating must be between 0 and 5".to_string()));
        }

        Ok(Hotel {
            id: Uuid::new_v4(),
            owner,
            name: self.name,
            location: self.location,
            price: self.price,
            star: self.star,
            rating: self.rating,
            property_type: self.property_type,
            amenities: self.amenities,
            facilities: self.facilities,
            created_at: Utc::now(),
        })
    }
}
