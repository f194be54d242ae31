//! Selection over already-fetched lists: the booking dashboard and hotel search.
//!
//! Criteria are plain values; every function here is pure. A default
//! criteria value selects everything and keeps the input order.

use std::str::FromStr;

use crate::{Booking, BookingStatus, CoreError, CoreResult, Hotel};

/// Dropdown placeholders ("Select...", "All Statuses") and blanks mean "no filter".
pub fn selected(raw: Option<&str>) -> Option<&str> {
    let value = raw?.trim();
    if value.is_empty() || value.starts_with("Select") || value.starts_with("All ") {
        None
    } else {
        Some(value)
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest first" | "newest" | "desc" => Ok(SortOrder::NewestFirst),
            "oldest first" | "oldest" | "asc" => Ok(SortOrder::OldestFirst),
            other => Err(CoreError::ValidationError(format!("Unknown sort order: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingCriteria {
    pub search: Option<String>,
    pub status: Option<BookingStatus>,
    pub sort: Option<SortOrder>,
}

impl BookingCriteria {
    pub fn from_params(search: Option<&str>, status: Option<&str>, sort: Option<&str>) -> CoreResult<Self> {
        Ok(Self {
            search: selected(search).map(str::to_lowercase),
            status: selected(status).map(str::parse::<BookingStatus>).transpose()?,
            sort: selected(sort).map(str::parse::<SortOrder>).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none() && self.sort.is_none()
    }

    fn matches(&self, booking: &Booking) -> bool {
        let search_ok = match &self.search {
            None => true,
            Some(term) => {
                contains_ci(&booking.id.to_string(), term)
                    || contains_ci(&booking.guest_name, term)
                    || booking.room_label().is_some_and(|label| contains_ci(&label, term))
                    || booking.pickup.as_deref().is_some_and(|p| contains_ci(p, term))
                    || booking.dropoff.as_deref().is_some_and(|d| contains_ci(d, term))
            }
        };
        let status_ok = self.status.map_or(true, |status| booking.status == status);

        search_ok && status_ok
    }
}

/// Bookings satisfying every active predicate, stably ordered by creation time
/// when a sort order is set.
pub fn select_bookings(bookings: &[Booking], criteria: &BookingCriteria) -> Vec<Booking> {
    let mut selected: Vec<Booking> = bookings
        .iter()
        .filter(|b| criteria.matches(b))
        .cloned()
        .collect();

    match criteria.sort {
        Some(SortOrder::NewestFirst) => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Some(SortOrder::OldestFirst) => selected.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        None => {}
    }

    selected
}

/// Star bucket `n` covers the open interval `(n - 1, n + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarBucket(u8);

impl StarBucket {
    pub fn new(stars: u8) -> CoreResult<Self> {
        if (1..=5).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(CoreError::ValidationError(format!("Star rating must be 1-5, got {}", stars)))
        }
    }

    pub fn contains(&self, star: f64) -> bool {
        let n = f64::from(self.0);
        star > n - 1.0 && star < n + 1.0
    }
}

impl FromStr for StarBucket {
    type Err = CoreError;

    /// Accepts "3", "3 Star" or "3 Stars".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digit = s
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| CoreError::ValidationError(format!("Invalid star rating: {}", s)))?;
        StarBucket::new(digit as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestRating {
    Excellent,
    VeryGood,
    Good,
    Pleasant,
}

impl GuestRating {
    pub fn minimum(&self) -> f64 {
        match self {
            GuestRating::Excellent => 4.5,
            GuestRating::VeryGood => 4.0,
            GuestRating::Good => 3.5,
            GuestRating::Pleasant => 3.0,
        }
    }
}

impl FromStr for GuestRating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        // "very good" before "good": the labels overlap, and "Very Good" selects
        // only the >= 4.0 band, never the Good (>= 3.5) band as well
        if lower.contains("excellent") {
            Ok(GuestRating::Excellent)
        } else if lower.contains("very good") {
            Ok(GuestRating::VeryGood)
        } else if lower.contains("good") {
            Ok(GuestRating::Good)
        } else if lower.contains("pleasant") {
            Ok(GuestRating::Pleasant)
        } else {
            Err(CoreError::ValidationError(format!("Invalid guest rating: {}", s)))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelCriteria {
    pub location: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub star_rating: Option<StarBucket>,
    pub guest_rating: Option<GuestRating>,
    pub property_type: Option<String>,
    pub amenity: Option<String>,
    pub facilities: Vec<String>,
}

impl HotelCriteria {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        if let Some(location) = &self.location {
            if !contains_ci(&hotel.location, &location.to_lowercase()) {
                return false;
            }
        }
        if self.min_budget.is_some_and(|min| hotel.price < min) {
            return false;
        }
        if self.max_budget.is_some_and(|max| hotel.price > max) {
            return false;
        }
        if self.star_rating.is_some_and(|bucket| !bucket.contains(hotel.star)) {
            return false;
        }
        if self.guest_rating.is_some_and(|band| hotel.rating < band.minimum()) {
            return false;
        }
        if let Some(kind) = &self.property_type {
            if !hotel.property_type.eq_ignore_ascii_case(kind) {
                return false;
            }
        }
        if let Some(amenity) = &self.amenity {
            let wanted = amenity.to_lowercase();
            if !hotel.amenities.iter().any(|a| contains_ci(a, &wanted)) {
                return false;
            }
        }

        self.facilities.iter().all(|wanted| {
            hotel
                .facilities
                .iter()
                .any(|have| have.to_lowercase() == wanted.to_lowercase())
        })
    }
}

pub fn select_hotels(hotels: &[Hotel], criteria: &HotelCriteria) -> Vec<Hotel> {
    hotels.iter().filter(|h| criteria.matches(h)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceKind;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn booking(guest: &str, status: BookingStatus, age_hours: i64) -> Booking {
        let created = Utc::now() - Duration::hours(age_hours);
        Booking {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            guest_name: guest.to_string(),
            kind: ResourceKind::Hotel,
            resource: Uuid::new_v4(),
            start_date: created + Duration::days(1),
            end_date: created + Duration::days(2),
            amount: 1200.0,
            room_count: Some(2),
            pickup: None,
            dropoff: None,
            status,
            created_at: created,
            updated_at: created,
        }
    }

    fn hotel(location: &str, star: f64, rating: f64, facilities: &[&str]) -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            name: format!("{} Inn", location),
            location: location.to_string(),
            price: 3000.0,
            star,
            rating,
            property_type: "Hotel".to_string(),
            amenities: vec!["Free WiFi".to_string()],
            facilities: facilities.iter().map(|f| f.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Booking> {
        vec![
            booking("Asha Rao", BookingStatus::Confirmed, 5),
            booking("Vikram", BookingStatus::Pending, 1),
            booking("Meera", BookingStatus::Confirmed, 10),
            booking("Dev", BookingStatus::Cancelled, 3),
        ]
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let list = sample();
        let criteria = BookingCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(select_bookings(&list, &criteria), list);
    }

    #[test]
    fn test_status_filter_and_idempotence() {
        let list = sample();
        let criteria = BookingCriteria::from_params(None, Some("Confirmed"), Some("Newest First")).unwrap();

        let once = select_bookings(&list, &criteria);
        assert_eq!(once.len(), 2);
        assert!(once.iter().all(|b| b.status == BookingStatus::Confirmed));

        let twice = select_bookings(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_newest_first_puts_latest_on_top() {
        let list = sample();
        let newest = select_bookings(
            &list,
            &BookingCriteria::from_params(None, None, Some("Newest First")).unwrap(),
        );
        assert_eq!(newest[0].guest_name, "Vikram");
        assert_eq!(newest[3].guest_name, "Meera");

        let oldest = select_bookings(
            &list,
            &BookingCriteria::from_params(None, Some("All Statuses"), Some("Oldest First")).unwrap(),
        );
        assert_eq!(oldest[0].guest_name, "Meera");
    }

    #[test]
    fn test_search_matches_name_id_and_rooms() {
        let list = sample();
        let by_name = BookingCriteria::from_params(Some("asha"), None, None).unwrap();
        assert_eq!(select_bookings(&list, &by_name).len(), 1);

        let id_prefix = list[2].id.to_string()[..8].to_string();
        let by_id = BookingCriteria::from_params(Some(&id_prefix), None, None).unwrap();
        assert_eq!(select_bookings(&list, &by_id)[0].guest_name, "Meera");

        let by_rooms = BookingCriteria::from_params(Some("2 rooms"), None, None).unwrap();
        assert_eq!(select_bookings(&list, &by_rooms).len(), 4);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(BookingCriteria::from_params(None, Some("Archived"), None).is_err());
        assert!(BookingCriteria::from_params(None, None, Some("sideways")).is_err());
    }

    #[test]
    fn test_star_bucket_boundaries() {
        let three: StarBucket = "3".parse().unwrap();
        assert!(three.contains(3.4));
        assert!(three.contains(2.5));
        assert!(!three.contains(4.0));
        assert!(!three.contains(2.0));

        assert_eq!("4 Star".parse::<StarBucket>().unwrap(), StarBucket::new(4).unwrap());
        assert!("9".parse::<StarBucket>().is_err());
    }

    #[test]
    fn test_guest_rating_bands_do_not_overlap_labels() {
        assert_eq!("Very Good (4+)".parse::<GuestRating>().unwrap(), GuestRating::VeryGood);
        assert_eq!("Good".parse::<GuestRating>().unwrap(), GuestRating::Good);

        let hotels = vec![hotel("Goa", 3.0, 3.8, &[]), hotel("Goa", 3.0, 4.2, &[])];
        let criteria = HotelCriteria {
            guest_rating: Some(GuestRating::VeryGood),
            ..HotelCriteria::default()
        };
        assert_eq!(select_hotels(&hotels, &criteria).len(), 1);
    }

    #[test]
    fn test_facilities_must_be_superset() {
        let hotels = vec![
            hotel("Manali", 3.4, 4.0, &["Parking", "Pool", "Spa"]),
            hotel("Manali", 4.0, 4.0, &["Parking"]),
        ];
        let criteria = HotelCriteria {
            location: Some("manali".to_string()),
            star_rating: Some(StarBucket::new(3).unwrap()),
            facilities: vec!["pool".to_string(), "PARKING".to_string()],
            ..HotelCriteria::default()
        };

        let found = select_hotels(&hotels, &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].star, 3.4);
    }

    #[test]
    fn test_placeholders_are_ignored() {
        assert_eq!(selected(Some("Select Star Rating")), None);
        assert_eq!(selected(Some("All Statuses")), None);
        assert_eq!(selected(Some("  ")), None);
        assert_eq!(selected(Some("Pool")), Some("Pool"));
    }
}
