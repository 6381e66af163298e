use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::ProfileChanges;

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
}

/// OAuth2 password-flow form posted to `/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Partial profile update
///
/// Every field is optional; absent or null fields keep their stored value.
/// The ranges below are the single validation policy for profile writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub interests: Option<Vec<String>>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_distance: Option<f64>,
    #[validate(range(min = 18))]
    pub preferred_age_range_min: Option<i32>,
    #[validate(range(min = 18))]
    pub preferred_age_range_max: Option<i32>,
    #[validate(range(min = 18))]
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl ProfileUpdateRequest {
    /// Convert into store-level changes, normalizing interests
    pub fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            latitude: self.latitude,
            longitude: self.longitude,
            interests: self.interests.map(normalize_interests),
            max_distance: self.max_distance,
            preferred_age_range_min: self.preferred_age_range_min,
            preferred_age_range_max: self.preferred_age_range_max,
            age: self.age,
            gender: self.gender,
        }
    }
}

/// Trim, drop empties and deduplicate, keeping first occurrence order
fn normalize_interests(interests: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(interests.len());
    for interest in interests {
        let trimmed = interest.trim();
        if !trimmed.is_empty() && !normalized.iter().any(|i| i == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
            full_name: "Ada".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest { email: "not-an-email".to_string(), ..ok.clone() };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest { password: "short".to_string(), ..ok };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_profile_update_ranges() {
        let ok = ProfileUpdateRequest {
            latitude: Some(90.0),
            longitude: Some(-180.0),
            max_distance: Some(100.0),
            age: Some(18),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let cases = [
            ProfileUpdateRequest { latitude: Some(90.5), ..Default::default() },
            ProfileUpdateRequest { longitude: Some(180.1), ..Default::default() },
            ProfileUpdateRequest { max_distance: Some(-1.0), ..Default::default() },
            ProfileUpdateRequest { max_distance: Some(100.5), ..Default::default() },
            ProfileUpdateRequest { age: Some(17), ..Default::default() },
            ProfileUpdateRequest { preferred_age_range_min: Some(17), ..Default::default() },
            ProfileUpdateRequest { preferred_age_range_max: Some(10), ..Default::default() },
        ];
        for case in cases {
            assert!(case.validate().is_err(), "expected rejection: {:?}", case);
        }
    }

    #[test]
    fn test_empty_update_is_valid() {
        let update: ProfileUpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(update.validate().is_ok());
        assert!(update.into_changes().is_empty());
    }

    #[test]
    fn test_interests_normalized() {
        let update = ProfileUpdateRequest {
            interests: Some(vec![
                " hiking ".to_string(),
                "chess".to_string(),
                "".to_string(),
                "hiking".to_string(),
            ]),
            ..Default::default()
        };

        let changes = update.into_changes();
        assert_eq!(changes.interests, Some(vec!["hiking".to_string(), "chess".to_string()]));
    }
}
