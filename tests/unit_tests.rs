// Unit tests for the Tag Match discovery core

use tag_match::core::{
    distance::{calculate_bounding_box, haversine_distance},
    filters::matches_age_range,
    matcher::find_nearby,
};
use tag_match::models::{AgeRange, Coordinate, NearbyQuery, UserId, UserProfile};

const EPSILON: f64 = 1e-6;

fn sample_points() -> Vec<Coordinate> {
    vec![
        Coordinate::new(0.0, 0.0),
        Coordinate::new(0.0, 1.0),
        Coordinate::new(10.0, 10.0),
        Coordinate::new(40.7128, -74.0060),
        Coordinate::new(51.5074, -0.1278),
        Coordinate::new(-33.8688, 151.2093),
        Coordinate::new(89.9, 45.0),
        Coordinate::new(-89.9, -135.0),
        Coordinate::new(0.0, 180.0),
        Coordinate::new(0.0, -180.0),
    ]
}

fn create_profile(id: UserId, lat: f64, lon: f64, age: Option<i32>) -> UserProfile {
    UserProfile {
        id,
        email: format!("user{}@example.com", id),
        full_name: format!("User {}", id),
        is_active: true,
        latitude: Some(lat),
        longitude: Some(lon),
        interests: None,
        max_distance: None,
        preferred_age_range_min: None,
        preferred_age_range_max: None,
        age,
        gender: None,
        created_at: None,
    }
}

fn create_query(origin: Coordinate, max_distance_km: f64) -> NearbyQuery {
    NearbyQuery {
        requester_id: 0,
        origin,
        max_distance_km,
        age_range: None,
        interests: vec![],
    }
}

#[test]
fn test_distance_to_self_is_zero() {
    for p in sample_points() {
        assert!(haversine_distance(p, p).abs() < EPSILON, "{:?}", p);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let points = sample_points();
    for &a in &points {
        for &b in &points {
            assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < EPSILON);
        }
    }
}

#[test]
fn test_triangle_inequality() {
    let points = sample_points();
    for &a in &points {
        for &b in &points {
            for &c in &points {
                let direct = haversine_distance(a, b);
                let detour = haversine_distance(a, c) + haversine_distance(c, b);
                assert!(direct <= detour + EPSILON, "{:?} {:?} via {:?}", a, b, c);
            }
        }
    }
}

#[test]
fn test_distance_manhattan_to_brooklyn() {
    let manhattan = Coordinate::new(40.7580, -73.9855);
    let brooklyn = Coordinate::new(40.6782, -73.9442);

    let distance = haversine_distance(manhattan, brooklyn);
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_antimeridian_points_are_close() {
    let east = Coordinate::new(0.0, 179.95);
    let west = Coordinate::new(0.0, -179.95);

    assert!(haversine_distance(east, west) < 12.0);
}

#[test]
fn test_bounding_box_creation() {
    let bbox = calculate_bounding_box(Coordinate::new(40.7128, -74.0060), 10.0);

    assert!(bbox.min_lat < 40.7128);
    assert!(bbox.max_lat > 40.7128);
    assert!(bbox.min_lon < -74.0060);
    assert!(bbox.max_lon > -74.0060);

    // Point just outside latitude is not within
    assert!(!bbox.contains(Coordinate::new(bbox.max_lat + 0.01, -74.0)));
}

#[test]
fn test_age_range_filter() {
    let range = Some(AgeRange { min: 25, max: 35 });

    let survivors: Vec<i32> = [Some(20), Some(30), Some(40), None]
        .into_iter()
        .filter(|age| matches_age_range(*age, range))
        .flatten()
        .collect();

    assert_eq!(survivors, vec![30]);
}

#[test]
fn test_filter_output_sorted_and_bounded() {
    let origin = Coordinate::new(48.1351, 11.5820);
    let max_distance_km = 60.0;

    let candidates: Vec<UserProfile> = (1..=60)
        .map(|i| {
            let spread = (i * 37 % 100) as f64 / 100.0;
            create_profile(i, 48.1351 + spread - 0.5, 11.5820 + (i % 7) as f64 * 0.15 - 0.45, Some(30))
        })
        .collect();

    let result = find_nearby(&create_query(origin, max_distance_km), candidates.clone());

    assert!(!result.is_empty());
    for pair in result.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km, "not sorted");
    }
    for entry in &result {
        assert!(entry.distance_km <= max_distance_km);
        assert_ne!(entry.profile.id, 0);
    }

    // Everything left out is really out of range
    let kept: Vec<UserId> = result.iter().map(|n| n.profile.id).collect();
    for candidate in &candidates {
        if !kept.contains(&candidate.id) {
            let location = candidate.coordinate().unwrap();
            assert!(haversine_distance(origin, location) > max_distance_km);
        }
    }
}

#[test]
fn test_filter_excludes_requester() {
    let origin = Coordinate::new(0.0, 0.0);
    let candidates = vec![create_profile(0, 0.0, 0.0, None), create_profile(1, 0.0, 0.0, None)];

    let result = find_nearby(&create_query(origin, 10.0), candidates);

    assert!(result.iter().all(|n| n.profile.id != 0));
    assert_eq!(result.len(), 1);
}
