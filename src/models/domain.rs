use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque user identity, the primary key of the `users` table
pub type UserId = i64;

/// A point on the Earth's surface in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Inclusive age range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

impl AgeRange {
    #[inline]
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min && age <= self.max
    }
}

/// A stored user with profile and discovery preferences
///
/// Created at registration with identity only; everything from `latitude`
/// down stays unset until the owner updates their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interests: Option<Vec<String>>,
    pub max_distance: Option<f64>,
    pub preferred_age_range_min: Option<i32>,
    pub preferred_age_range_max: Option<i32>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Location of the user, present only when both latitude and longitude are set
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate { latitude, longitude }),
            _ => None,
        }
    }

    /// Preferred age range, present only when both bounds are set
    pub fn preferred_age_range(&self) -> Option<AgeRange> {
        match (self.preferred_age_range_min, self.preferred_age_range_max) {
            (Some(min), Some(max)) => Some(AgeRange { min, max }),
            _ => None,
        }
    }

    /// Describe the stored age bounds when they are both set and out of order
    pub fn age_range_violation(&self) -> Option<String> {
        match (self.preferred_age_range_min, self.preferred_age_range_max) {
            (Some(min), Some(max)) if min > max => Some(format!(
                "preferred_age_range_min ({}) must not exceed preferred_age_range_max ({})",
                min, max
            )),
            _ => None,
        }
    }

    pub fn interests(&self) -> &[String] {
        self.interests.as_deref().unwrap_or_default()
    }
}

/// Fields needed to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub hashed_password: String,
}

/// Stored login material for an account
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub email: String,
    pub hashed_password: String,
}

/// Partial profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interests: Option<Vec<String>>,
    pub max_distance: Option<f64>,
    pub preferred_age_range_min: Option<i32>,
    pub preferred_age_range_max: Option<i32>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the changes to a profile in place
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(latitude) = self.latitude {
            profile.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            profile.longitude = Some(longitude);
        }
        if let Some(interests) = &self.interests {
            profile.interests = Some(interests.clone());
        }
        if let Some(max_distance) = self.max_distance {
            profile.max_distance = Some(max_distance);
        }
        if let Some(min) = self.preferred_age_range_min {
            profile.preferred_age_range_min = Some(min);
        }
        if let Some(max) = self.preferred_age_range_max {
            profile.preferred_age_range_max = Some(max);
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(gender) = &self.gender {
            profile.gender = Some(gender.clone());
        }
    }
}

/// A discovery result entry
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyUser {
    pub profile: UserProfile,
    pub distance_km: f64,
    /// True when an age-range filter was applied and the candidate passed it
    pub age_checked: bool,
    pub shared_interests: Vec<String>,
}

/// Geospatial bounding box, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// One page of the candidate pool, as requested from storage
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub exclude_user_id: UserId,
    pub bounding_box: Option<BoundingBox>,
    /// Keyset cursor: only ids strictly greater than this are returned
    pub after_id: Option<UserId>,
    pub limit: usize,
}

/// Parameters of the nearby filter for one requester
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub requester_id: UserId,
    pub origin: Coordinate,
    pub max_distance_km: f64,
    pub age_range: Option<AgeRange>,
    pub interests: Vec<String>,
}
