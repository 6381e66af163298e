use actix_web::{error, http::header, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::{AuthError, DiscoveryError, ProfileError, StoreError};

/// Error returned by HTTP handlers, rendered as an [`ErrorResponse`] body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn error_kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.error_kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        };

        let mut response = HttpResponse::build(status);
        if matches!(self, ApiError::Unauthorized(_)) {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(body)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(format!("User {} not found", id)),
            StoreError::Invalid(message) => ApiError::Validation(message),
            other => {
                tracing::error!("Store failure: {}", other);
                ApiError::Internal("Storage unavailable".to_string())
            }
        }
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            // Client-correctable, not a system fault
            DiscoveryError::LocationNotSet => {
                tracing::info!("Discovery rejected: {}", err);
                ApiError::BadRequest(err.to_string())
            }
            DiscoveryError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            DiscoveryError::Store(store) => store.into(),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(message) => ApiError::Validation(message),
            ProfileError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProfileError::Store(store) => store.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::BadRequest(err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken => ApiError::Unauthorized(err.to_string()),
            AuthError::Store(store) => store.into(),
            other => {
                tracing::error!("Auth failure: {}", other);
                ApiError::Internal("Authentication unavailable".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle form payload errors
pub fn handle_form_payload_error(err: error::UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Form payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid form: {}", err)).into()
}
