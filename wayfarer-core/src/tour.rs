use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::de::{flexible_date, number_or_text, text_or_number};
use crate::{CoreError, CoreResult};

/// One day of a tour itinerary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TourPlanDay {
    #[serde(default, deserialize_with = "text_or_number")]
    pub day: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A bookable travel package.
///
/// Most descriptive fields are optional: companion tours created alongside a
/// new category carry only the category and description, and a full update
/// clears whatever the caller leaves out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tour_type: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub reviews: Option<i32>,
    pub location: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub tour_plan: Vec<TourPlanDay>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_till: Option<DateTime<Utc>>,
    #[serde(default)]
    pub featured: bool,
    pub category: Option<String>,
    /// Legacy package list kept for older clients; always empty for new tours.
    #[serde(default)]
    pub types: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            tour_type: None,
            description: None,
            image: None,
            price: None,
            rating: None,
            reviews: None,
            location: None,
            duration: None,
            photos: Vec::new(),
            inclusions: Vec::new(),
            tour_plan: Vec::new(),
            available_from: None,
            available_till: None,
            featured: false,
            category: None,
            types: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The placeholder tour seeded when a category is created.
    pub fn companion(category: &str, description: &str) -> Self {
        let mut tour = Self::blank(Utc::now());
        tour.category = Some(category.to_string());
        tour.description = Some(description.to_string());
        tour
    }
}

/// Rewrites Windows-style separators so stored image paths are URL friendly.
pub fn normalize_image_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Incoming tour body, shared by direct creation and full replacement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tour_type: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub reviews: Option<i32>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration: Option<String>,
    pub photos: Option<Vec<String>>,
    pub inclusions: Option<Vec<String>>,
    pub tour_plan: Option<Vec<TourPlanDay>>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub available_till: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
}

impl TourPayload {
    /// Required fields the payload leaves out. Presence is what counts, so a
    /// price or rating of zero is accepted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("name", self.name.is_some()),
            ("type", self.tour_type.is_some()),
            ("description", self.description.is_some()),
            ("image", self.image.is_some()),
            ("price", self.price.is_some()),
            ("rating", self.rating.is_some()),
            ("reviews", self.reviews.is_some()),
            ("location", self.location.is_some()),
            ("duration", self.duration.is_some()),
            ("photos", self.photos.is_some()),
            ("inclusions", self.inclusions.is_some()),
            ("tourPlan", self.tour_plan.is_some()),
            ("availableFrom", self.available_from.is_some()),
            ("availableTill", self.available_till.is_some()),
        ];

        checks
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(field, _)| field)
            .collect()
    }

    /// Builds a new tour, rejecting the payload if any required field is absent.
    pub fn into_tour(self) -> CoreResult<Tour> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "All fields are required, missing: {}",
                missing.join(", ")
            )));
        }

        let mut tour = Tour::blank(Utc::now());
        self.write_into(&mut tour);
        Ok(tour)
    }

    /// Replaces every tracked field of `existing`. Nothing is merged: omitted
    /// fields end up empty.
    pub fn overwrite(self, mut existing: Tour) -> Tour {
        self.write_into(&mut existing);
        existing.updated_at = Utc::now();
        existing
    }

    fn write_into(self, tour: &mut Tour) {
        tour.name = self.name;
        tour.tour_type = self.tour_type;
        tour.description = self.description;
        tour.image = self.image.as_deref().map(normalize_image_path);
        tour.price = self.price;
        tour.rating = self.rating;
        tour.reviews = self.reviews;
        tour.location = self.location;
        tour.duration = self.duration;
        tour.photos = self.photos.unwrap_or_default();
        tour.inclusions = self.inclusions.unwrap_or_default();
        tour.tour_plan = self.tour_plan.unwrap_or_default();
        tour.available_from = self.available_from;
        tour.available_till = self.available_till;
        tour.featured = self.featured.unwrap_or(false);
    }
}

/// A named grouping of tours, unique by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourCategory {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TourCategory {
    pub fn new(category: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPayload {
    pub category: Option<String>,
    pub description: Option<String>,
}

impl CategoryPayload {
    /// Returns `(category, description)`; a name that is blank after trimming counts as missing.
    pub fn validate(self) -> CoreResult<(String, String)> {
        let category = self.category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        let description = self.description.filter(|d| !d.trim().is_empty());

        match (category, description) {
            (Some(category), Some(description)) => Ok((category, description)),
            _ => Err(CoreError::ValidationError("All fields are required".to_string())),
        }
    }
}
