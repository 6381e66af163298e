use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{CandidateQuery, Credentials, NewUser, ProfileChanges, UserId, UserProfile};
use crate::services::store::{ProfileStore, StoreError};

#[derive(Debug, Clone)]
struct StoredUser {
    profile: UserProfile,
    hashed_password: String,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: UserId,
    users: BTreeMap<UserId, StoredUser>,
}

/// In-process profile store
///
/// Keeps users ordered by id so paging behaves like the SQL store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserProfile, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.profile.email == new_user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                new_user.email
            )));
        }

        inner.next_id += 1;
        let id = inner.next_id;

        let profile = UserProfile {
            id,
            email: new_user.email,
            full_name: new_user.full_name,
            is_active: true,
            latitude: None,
            longitude: None,
            interests: None,
            max_distance: None,
            preferred_age_range_min: None,
            preferred_age_range_max: None,
            age: None,
            gender: None,
            created_at: Some(chrono::Utc::now()),
        };

        inner.users.insert(
            id,
            StoredUser {
                profile: profile.clone(),
                hashed_password: new_user.hashed_password,
            },
        );

        Ok(profile)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner
            .users
            .values()
            .find(|u| u.profile.email == email)
            .map(|u| Credentials {
                user_id: u.profile.id,
                email: u.profile.email.clone(),
                hashed_password: u.hashed_password.clone(),
            }))
    }

    async fn get_profile(&self, id: UserId) -> Result<UserProfile, StoreError> {
        let inner = self.inner.read().await;

        inner
            .users
            .get(&id)
            .map(|u| u.profile.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_other_profiles(&self, query: &CandidateQuery) -> Result<Vec<UserProfile>, StoreError> {
        let inner = self.inner.read().await;
        let start = query.after_id.map_or(UserId::MIN, |after| after.saturating_add(1));

        Ok(inner
            .users
            .range(start..)
            .map(|(_, u)| &u.profile)
            .filter(|p| p.id != query.exclude_user_id)
            .filter(|p| match (p.coordinate(), query.bounding_box) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(location), Some(bbox)) => bbox.contains(location),
            })
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: UserId, changes: &ProfileChanges) -> Result<UserProfile, StoreError> {
        let mut inner = self.inner.write().await;

        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let mut merged = user.profile.clone();
        changes.apply_to(&mut merged);
        if let Some(violation) = merged.age_range_violation() {
            return Err(StoreError::Invalid(violation));
        }

        user.profile = merged.clone();

        Ok(merged)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundingBox, Coordinate};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            hashed_password: "hash".to_string(),
        }
    }

    async fn place(store: &MemoryStore, email: &str, location: Coordinate) -> UserId {
        let user = store.create_user(new_user(email)).await.unwrap();
        let changes = ProfileChanges {
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            ..Default::default()
        };
        store.update_profile(user.id, &changes).await.unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_create_user_starts_unset() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        assert_eq!(user.id, 1);
        assert!(user.coordinate().is_none());
        assert!(user.max_distance.is_none());
        assert!(user.preferred_age_range().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let result = store.create_user(new_user("a@example.com")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        let first = ProfileChanges { age: Some(30), gender: Some("f".to_string()), ..Default::default() };
        store.update_profile(user.id, &first).await.unwrap();

        let second = ProfileChanges { age: Some(31), ..Default::default() };
        let updated = store.update_profile(user.id, &second).await.unwrap();

        assert_eq!(updated.age, Some(31));
        assert_eq!(updated.gender.as_deref(), Some("f"));
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_age_range() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        let range = ProfileChanges {
            preferred_age_range_min: Some(20),
            preferred_age_range_max: Some(40),
            ..Default::default()
        };
        store.update_profile(user.id, &range).await.unwrap();

        let inverting = ProfileChanges { preferred_age_range_min: Some(45), age: Some(30), ..Default::default() };
        let result = store.update_profile(user.id, &inverting).await;
        assert!(matches!(result, Err(StoreError::Invalid(_))));

        // Nothing from the rejected write is kept
        let stored = store.get_profile(user.id).await.unwrap();
        assert_eq!(stored.preferred_age_range(), Some(crate::models::AgeRange { min: 20, max: 40 }));
        assert!(stored.age.is_none());
    }

    #[tokio::test]
    async fn test_missing_user() {
        let store = MemoryStore::new();

        assert!(matches!(store.get_profile(42).await, Err(StoreError::NotFound(42))));
        assert!(matches!(
            store.update_profile(42, &ProfileChanges::default()).await,
            Err(StoreError::NotFound(42))
        ));
        assert!(store.find_credentials("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pages_and_filters() {
        let store = MemoryStore::new();
        let me = place(&store, "me@example.com", Coordinate::new(0.0, 0.0)).await;
        let near = place(&store, "near@example.com", Coordinate::new(0.0, 0.5)).await;
        store.create_user(new_user("unplaced@example.com")).await.unwrap();
        let far = place(&store, "far@example.com", Coordinate::new(45.0, 45.0)).await;

        let mut query = CandidateQuery {
            exclude_user_id: me,
            bounding_box: None,
            after_id: None,
            limit: 1,
        };

        let first = store.list_other_profiles(&query).await.unwrap();
        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![near]);

        query.after_id = Some(near);
        let second = store.list_other_profiles(&query).await.unwrap();
        assert_eq!(second.iter().map(|p| p.id).collect::<Vec<_>>(), vec![far]);

        query.after_id = Some(far);
        assert!(store.list_other_profiles(&query).await.unwrap().is_empty());

        query.after_id = None;
        query.limit = 10;
        query.bounding_box = Some(BoundingBox { min_lat: -1.0, max_lat: 1.0, min_lon: -1.0, max_lon: 1.0 });
        let boxed = store.list_other_profiles(&query).await.unwrap();
        assert_eq!(boxed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![near]);
    }
}
