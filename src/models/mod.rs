// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeRange, BoundingBox, CandidateQuery, Coordinate, Credentials, NearbyQuery, NearbyUser,
    NewUser, ProfileChanges, UserId, UserProfile,
};
pub use requests::{ProfileUpdateRequest, RegisterRequest, TokenRequest};
pub use responses::{ErrorResponse, HealthResponse, NearbyUserResponse, TokenResponse, UserResponse};
