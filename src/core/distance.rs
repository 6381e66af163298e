use crate::models::{BoundingBox, Coordinate};

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack added to bounding box edges so rounding never excludes a point on the circle
const BOX_EPSILON_DEG: f64 = 1e-9;

/// Calculate the Haversine distance between two points in kilometers
///
/// The argument of `asin` is clamped to 1 so nearly antipodal points cannot
/// produce NaN through floating-point overshoot.
///
/// # Returns
/// Distance in kilometers, `0.0` for identical points
#[inline]
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Calculate a bounding box around a center point
///
/// The box is a superset of the circle of `radius_km` around `center`, so it
/// can be used as a storage-side pre-filter without losing candidates. When
/// the circle touches a pole or crosses the antimeridian the longitude span
/// covers the whole range.
pub fn calculate_bounding_box(center: Coordinate, radius_km: f64) -> BoundingBox {
    let angular = radius_km.max(0.0) / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees() + BOX_EPSILON_DEG;

    let min_lat = (center.latitude - lat_delta).max(-90.0);
    let max_lat = (center.latitude + lat_delta).min(90.0);

    let full_longitude = BoundingBox {
        min_lat,
        max_lat,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return full_longitude;
    }

    let ratio = angular.sin() / center.latitude.to_radians().cos();
    if !ratio.is_finite() || ratio >= 1.0 {
        return full_longitude;
    }

    let lon_delta = ratio.asin().to_degrees() + BOX_EPSILON_DEG;
    let min_lon = center.longitude - lon_delta;
    let max_lon = center.longitude + lon_delta;

    if min_lon < -180.0 || max_lon > 180.0 {
        return full_longitude;
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

impl BoundingBox {
    /// Check if a point is within the bounding box, edges included
    #[inline]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}
