use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::models::{NewUser, RegisterRequest, UserId, UserProfile};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur during registration, login and token checks
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid token lifetime: {0} minutes")]
    InvalidLifetime(i64),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

/// Issues and verifies HMAC-signed access tokens
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: &str, expire_minutes: i64) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AuthError::UnsupportedAlgorithm(algorithm.to_string()))?;

        // Only shared-secret algorithms can be driven from a single secret key
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        let expires_in = Duration::try_minutes(expire_minutes)
            .filter(|lifetime| *lifetime > Duration::zero())
            .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or(AuthError::InvalidLifetime(expire_minutes))?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        })
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        Self::new(
            &settings.secret_key,
            &settings.algorithm,
            settings.access_token_expire_minutes,
        )
    }

    /// Issue an access token for a user
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.expires_in)
            .ok_or(AuthError::InvalidLifetime(self.expires_in.num_minutes()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(encode(&Header::new(self.algorithm), claims, &self.encoding_key)?)
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let validation = Validation::new(self.algorithm);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected access token: {}", e);
            AuthError::InvalidToken
        })?;

        data.claims.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Check a password against a bcrypt hash on the blocking pool
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await??;
    Ok(valid)
}

/// Register a new account with identity and credentials only
pub async fn register(
    store: &dyn ProfileStore,
    request: &RegisterRequest,
    bcrypt_cost: u32,
) -> Result<UserProfile, AuthError> {
    if store.find_credentials(&request.email).await?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let hashed_password = hash_password(&request.password, bcrypt_cost).await?;

    let new_user = NewUser {
        email: request.email.clone(),
        full_name: request.full_name.clone(),
        hashed_password,
    };

    // A concurrent registration can still win between the check and the insert
    store.create_user(new_user).await.map_err(|e| match e {
        StoreError::Conflict(_) => AuthError::EmailTaken,
        other => AuthError::Store(other),
    })
}

/// Check credentials and issue an access token
pub async fn login(
    store: &dyn ProfileStore,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let credentials = store
        .find_credentials(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &credentials.hashed_password).await? {
        return Err(AuthError::InvalidCredentials);
    }

    tokens.issue(credentials.user_id, &credentials.email)
}
