use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CandidateQuery, Credentials, NewUser, ProfileChanges, UserId, UserProfile};

/// Errors that can occur in a profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The write would leave the row violating a profile invariant
    #[error("Invalid profile: {0}")]
    Invalid(String),
}

/// Persistence boundary for user profiles
///
/// Handlers pass a store into each service call; there is no process-wide
/// session. Every mutation is a single-row write scoped to one user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create an account with identity and credentials only
    ///
    /// Returns [`StoreError::Conflict`] when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<UserProfile, StoreError>;

    /// Look up login material by email
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError>;

    async fn get_profile(&self, id: UserId) -> Result<UserProfile, StoreError>;

    /// Fetch one page of the candidate pool
    ///
    /// Excludes `query.exclude_user_id` and users without both coordinates,
    /// applies the bounding box when given, and returns at most `query.limit`
    /// profiles with ids greater than `query.after_id`, in ascending id order.
    async fn list_other_profiles(&self, query: &CandidateQuery) -> Result<Vec<UserProfile>, StoreError>;

    /// Write the provided fields of one user's row and return the result
    ///
    /// The merged row must keep `preferred_age_range_min <= preferred_age_range_max`;
    /// the check and the write are atomic, failing with [`StoreError::Invalid`].
    async fn update_profile(&self, id: UserId, changes: &ProfileChanges) -> Result<UserProfile, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
