use crate::models::{AgeRange, UserProfile};

/// Check whether a candidate passes the requester's age range
///
/// No range means no age filtering. With a range active, candidates that
/// have not recorded an age are excluded.
#[inline]
pub fn matches_age_range(age: Option<i32>, range: Option<AgeRange>) -> bool {
    match range {
        None => true,
        Some(range) => age.is_some_and(|age| range.contains(age)),
    }
}

/// Check whether a candidate is within the effective max distance, inclusive
#[inline]
pub fn within_distance(distance_km: f64, max_distance_km: f64) -> bool {
    distance_km <= max_distance_km
}

/// Interests present on both sides, in the candidate's order
pub fn shared_interests(candidate: &UserProfile, interests: &[String]) -> Vec<String> {
    if interests.is_empty() {
        return Vec::new();
    }

    candidate
        .interests()
        .iter()
        .filter(|interest| interests.contains(interest))
        .cloned()
        .collect()
}
