use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};
use validator::Validate;

use crate::models::{RegisterRequest, TokenRequest, TokenResponse, UserId, UserResponse};
use crate::routes::{error::ApiError, AppState};
use crate::services::auth;

/// Identity of the caller, taken from a verified bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Could not validate credentials".to_string());

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState missing from application data");
        ApiError::Internal("Server misconfigured".to_string())
    })?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(unauthorized)?;

    let user_id = state.tokens.verify(token).map_err(|_| unauthorized())?;

    Ok(AuthenticatedUser { user_id })
}

/// Extract the token from an `Authorization: Bearer <token>` header value
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Configure the account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/token", web::post().to(issue_token));
}

/// Register endpoint
///
/// POST /register
///
/// Request body:
/// ```json
/// { "email": "string", "password": "string", "full_name": "string" }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let user = auth::register(state.store.as_ref(), &req, state.bcrypt_cost).await?;

    tracing::info!("Registered user {}", user.id);

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Token endpoint (OAuth2 password flow)
///
/// POST /token with form fields `username` and `password`
async fn issue_token(
    state: web::Data<AppState>,
    form: web::Form<TokenRequest>,
) -> Result<HttpResponse, ApiError> {
    let access_token = auth::login(
        state.store.as_ref(),
        &state.tokens,
        &form.username,
        &form.password,
    )
    .await
    .inspect_err(|e| tracing::info!("Login failed for {}: {}", form.username, e))?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
