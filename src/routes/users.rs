use actix_web::{web, HttpResponse};

use crate::models::{NearbyUserResponse, ProfileUpdateRequest, UserResponse};
use crate::routes::{auth::AuthenticatedUser, error::ApiError, AppState};
use crate::services::profiles;

/// Configure the user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/me", web::get().to(read_me))
            .route("/profile", web::put().to(update_profile))
            .route("/nearby", web::get().to(nearby_users)),
    );
}

/// A valid token whose user no longer exists is a credentials failure
fn caller_missing(err: ApiError) -> ApiError {
    match err {
        ApiError::NotFound(_) => ApiError::Unauthorized("Could not validate credentials".to_string()),
        other => other,
    }
}

/// GET /users/me
async fn read_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .store
        .get_profile(user.user_id)
        .await
        .map_err(|e| caller_missing(e.into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

/// Update profile endpoint
///
/// PUT /users/profile
///
/// Request body (every field optional):
/// ```json
/// {
///   "latitude": 52.52,
///   "longitude": 13.405,
///   "interests": ["climbing"],
///   "max_distance": 25.0,
///   "preferred_age_range_min": 25,
///   "preferred_age_range_max": 35,
///   "age": 29,
///   "gender": "female"
/// }
/// ```
async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ProfileUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let updated = profiles::update_profile(state.store.as_ref(), user.user_id, req.into_inner())
        .await
        .map_err(|e| caller_missing(e.into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// Nearby users endpoint
///
/// GET /users/nearby
///
/// Returns users within the caller's max distance (or the default), nearest
/// first, each with its `distance_km`.
async fn nearby_users(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Finding nearby users for user {}", user.user_id);

    let nearby = state
        .discovery
        .discover(state.store.as_ref(), user.user_id)
        .await
        .map_err(|e| caller_missing(e.into()))?;

    tracing::info!("Returning {} nearby users for user {}", nearby.len(), user.user_id);

    let response: Vec<NearbyUserResponse> = nearby.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}
