// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;

pub use distance::{calculate_bounding_box, haversine_distance, EARTH_RADIUS_KM};
pub use filters::{matches_age_range, shared_interests, within_distance};
pub use matcher::find_nearby;
