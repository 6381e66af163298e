use crate::core::{
    distance::haversine_distance,
    filters::{matches_age_range, shared_interests, within_distance},
};
use crate::models::{NearbyQuery, NearbyUser, UserProfile};

/// Find the candidates near the requester
///
/// # Pipeline Stages
/// 1. Drop the requester and candidates without a location
/// 2. Distance filtering against the effective max distance
/// 3. Age-range filtering, when the requester has a range
/// 4. Stable sort by ascending distance
///
/// Pure over its inputs; an empty or fully filtered pool yields an empty vector.
pub fn find_nearby(query: &NearbyQuery, candidates: Vec<UserProfile>) -> Vec<NearbyUser> {
    let age_checked = query.age_range.is_some();

    let mut nearby: Vec<NearbyUser> = candidates
        .into_iter()
        .filter(|profile| profile.id != query.requester_id)
        .filter_map(|profile| {
            let location = profile.coordinate()?;
            let distance_km = haversine_distance(query.origin, location);

            if !within_distance(distance_km, query.max_distance_km) {
                return None;
            }
            if !matches_age_range(profile.age, query.age_range) {
                return None;
            }

            let shared_interests = shared_interests(&profile, &query.interests);

            Some(NearbyUser {
                profile,
                distance_km,
                age_checked,
                shared_interests,
            })
        })
        .collect();

    // sort_by is stable, so equal distances keep candidate order
    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    nearby
}
