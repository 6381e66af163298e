use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::models::{CandidateQuery, Credentials, NewUser, ProfileChanges, UserId, UserProfile};
use crate::services::store::{ProfileStore, StoreError};

const PROFILE_COLUMNS: &str = r#"
    id, email, full_name, is_active, latitude, longitude, interests, max_distance,
    preferred_age_range_min, preferred_age_range_max, age, gender, created_at
"#;

/// Row of the `users` table without the password hash
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    full_name: String,
    is_active: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    interests: Option<Vec<String>>,
    max_distance: Option<f64>,
    preferred_age_range_min: Option<i32>,
    preferred_age_range_max: Option<i32>,
    age: Option<i32>,
    gender: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            is_active: row.is_active,
            latitude: row.latitude,
            longitude: row.longitude,
            interests: row.interests,
            max_distance: row.max_distance,
            preferred_age_range_min: row.preferred_age_range_min,
            preferred_age_range_max: row.preferred_age_range_max,
            age: row.age,
            gender: row.gender,
            created_at: Some(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    id: i64,
    email: String,
    hashed_password: String,
}

/// PostgreSQL-backed profile store
///
/// Owns the connection pool; each request borrows a connection for the
/// duration of a single statement.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &crate::config::DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserProfile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO users (email, hashed_password, full_name)
            VALUES ($1, $2, $3)
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&new_user.email)
            .bind(&new_user.hashed_password)
            .bind(&new_user.full_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::Conflict(format!("email {} already registered", new_user.email))
                }
                other => StoreError::SqlxError(other),
            })?;

        tracing::debug!("Created user {} ({})", row.id, row.email);

        Ok(row.into())
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let query = r#"
            SELECT id, email, hashed_password
            FROM users
            WHERE email = $1
        "#;

        let row = sqlx::query_as::<_, CredentialsRow>(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Credentials {
            user_id: row.id,
            email: row.email,
            hashed_password: row.hashed_password,
        }))
    }

    async fn get_profile(&self, id: UserId) -> Result<UserProfile, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Into::into)
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_other_profiles(&self, query: &CandidateQuery) -> Result<Vec<UserProfile>, StoreError> {
        let sql = format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM users
            WHERE id <> $1
              AND latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND ($2::BIGINT IS NULL OR id > $2)
              AND ($3::FLOAT8 IS NULL OR (
                    latitude BETWEEN $3 AND $4
                AND longitude BETWEEN $5 AND $6))
            ORDER BY id
            LIMIT $7
            "#
        );

        let bbox = query.bounding_box;

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(query.exclude_user_id)
            .bind(query.after_id)
            .bind(bbox.map(|b| b.min_lat))
            .bind(bbox.map(|b| b.max_lat))
            .bind(bbox.map(|b| b.min_lon))
            .bind(bbox.map(|b| b.max_lon))
            .bind(query.limit as i64)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            "Fetched {} candidates for user {} after {:?}",
            rows.len(),
            query.exclude_user_id,
            query.after_id
        );

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_profile(&self, id: UserId, changes: &ProfileChanges) -> Result<UserProfile, StoreError> {
        let query = format!(
            r#"
            UPDATE users SET
                latitude = COALESCE($2, latitude),
                longitude = COALESCE($3, longitude),
                interests = COALESCE($4, interests),
                max_distance = COALESCE($5, max_distance),
                preferred_age_range_min = COALESCE($6, preferred_age_range_min),
                preferred_age_range_max = COALESCE($7, preferred_age_range_max),
                age = COALESCE($8, age),
                gender = COALESCE($9, gender)
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(changes.latitude)
            .bind(changes.longitude)
            .bind(changes.interests.as_deref())
            .bind(changes.max_distance)
            .bind(changes.preferred_age_range_min)
            .bind(changes.preferred_age_range_max)
            .bind(changes.age)
            .bind(changes.gender.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_check_violation() => StoreError::Invalid(format!(
                    "update rejected by constraint {}",
                    db.constraint().unwrap_or("unknown")
                )),
                other => StoreError::SqlxError(other),
            })?
            .ok_or(StoreError::NotFound(id))?;

        tracing::debug!("Updated profile for user {}", id);

        Ok(row.into())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
