use serde::{Deserialize, Serialize};

use crate::models::domain::{NearbyUser, UserId, UserProfile};

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
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
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            is_active: profile.is_active,
            latitude: profile.latitude,
            longitude: profile.longitude,
            interests: profile.interests,
            max_distance: profile.max_distance,
            preferred_age_range_min: profile.preferred_age_range_min,
            preferred_age_range_max: profile.preferred_age_range_max,
            age: profile.age,
            gender: profile.gender,
        }
    }
}

/// Entry of the `/users/nearby` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub distance_km: f64,
    pub age_checked: bool,
    pub shared_interests: Vec<String>,
}

impl From<NearbyUser> for NearbyUserResponse {
    fn from(nearby: NearbyUser) -> Self {
        Self {
            user: nearby.profile.into(),
            distance_km: nearby.distance_km,
            age_checked: nearby.age_checked,
            shared_interests: nearby.shared_interests,
        }
    }
}

/// Bearer token issued by `/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
