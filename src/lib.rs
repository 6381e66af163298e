//! Tag Match - location-based nearby matching service for the Tag social app
//!
//! Users register, set a profile with a location and preferences, and query
//! for nearby users within their distance and age criteria. The discovery
//! core is a haversine distance filter over the candidate pool.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_bounding_box, find_nearby, haversine_distance};
pub use models::{AgeRange, Coordinate, NearbyQuery, NearbyUser, UserProfile};
pub use services::{DiscoveryError, DiscoveryService, MemoryStore, PostgresStore, ProfileStore};
