use thiserror::Error;
use validator::Validate;

use crate::models::{ProfileUpdateRequest, UserId, UserProfile};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur when updating a profile
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ProfileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ProfileError::NotFound(id),
            StoreError::Invalid(message) => ProfileError::Validation(message),
            other => ProfileError::Store(other),
        }
    }
}

/// Validate and apply a partial profile update to the caller's own row
///
/// Field ranges come from the request's `Validate` derive. The age bounds
/// are additionally checked against each other after merging with the
/// stored values, so an update that sets only one bound cannot invert the
/// range either. The store repeats that check atomically with the write,
/// which covers concurrent updates racing past the early check.
pub async fn update_profile(
    store: &dyn ProfileStore,
    user_id: UserId,
    request: ProfileUpdateRequest,
) -> Result<UserProfile, ProfileError> {
    request
        .validate()
        .map_err(|errors| ProfileError::Validation(errors.to_string()))?;

    let changes = request.into_changes();
    let current = store.get_profile(user_id).await?;

    if changes.is_empty() {
        return Ok(current);
    }

    let mut merged = current;
    changes.apply_to(&mut merged);

    if let Some(violation) = merged.age_range_violation() {
        return Err(ProfileError::Validation(violation));
    }

    let updated = store.update_profile(user_id, &changes).await?;

    tracing::info!("Updated profile for user {}", user_id);

    Ok(updated)
}
