use thiserror::Error;

use crate::config::DiscoverySettings;
use crate::core::{calculate_bounding_box, find_nearby};
use crate::models::{CandidateQuery, NearbyQuery, NearbyUser, UserId, UserProfile};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur during discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The requester has no stored coordinate; the client must set one first
    #[error("User location not set")]
    LocationNotSet,

    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Nearby-user discovery
///
/// Stateless across requests: each call reads the requester and the
/// candidate pool from the store it is handed and runs the nearby filter
/// over that snapshot.
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    default_max_distance_km: f64,
    page_size: usize,
    prefilter_bounding_box: bool,
}

impl DiscoveryService {
    pub fn new(default_max_distance_km: f64, page_size: usize, prefilter_bounding_box: bool) -> Self {
        Self {
            default_max_distance_km,
            page_size: page_size.max(1),
            prefilter_bounding_box,
        }
    }

    pub fn from_settings(settings: &DiscoverySettings) -> Self {
        Self::new(
            settings.default_max_distance_km,
            settings.page_size,
            settings.prefilter_bounding_box,
        )
    }

    /// Find users near the requester, nearest first
    pub async fn discover(
        &self,
        store: &dyn ProfileStore,
        requester_id: UserId,
    ) -> Result<Vec<NearbyUser>, DiscoveryError> {
        let requester = store.get_profile(requester_id).await.map_err(|e| match e {
            StoreError::NotFound(id) => DiscoveryError::UserNotFound(id),
            other => DiscoveryError::Store(other),
        })?;

        let query = self.build_query(&requester)?;

        let candidates = self.load_candidates(store, &query).await?;
        let total_candidates = candidates.len();

        let nearby = find_nearby(&query, candidates);

        tracing::debug!(
            "Discovery for user {}: {} nearby of {} candidates within {}km",
            requester_id,
            nearby.len(),
            total_candidates,
            query.max_distance_km
        );

        Ok(nearby)
    }

    /// Resolve the filter parameters from the requester's stored preferences
    fn build_query(&self, requester: &UserProfile) -> Result<NearbyQuery, DiscoveryError> {
        let origin = requester.coordinate().ok_or(DiscoveryError::LocationNotSet)?;

        Ok(NearbyQuery {
            requester_id: requester.id,
            origin,
            max_distance_km: self.effective_max_distance(requester),
            age_range: requester.preferred_age_range(),
            interests: requester.interests().to_vec(),
        })
    }

    /// Stored preference when set, otherwise the configured default
    pub fn effective_max_distance(&self, requester: &UserProfile) -> f64 {
        requester.max_distance.unwrap_or(self.default_max_distance_km)
    }

    /// Page through the candidate pool with a keyset cursor
    async fn load_candidates(
        &self,
        store: &dyn ProfileStore,
        query: &NearbyQuery,
    ) -> Result<Vec<UserProfile>, StoreError> {
        let bounding_box = self
            .prefilter_bounding_box
            .then(|| calculate_bounding_box(query.origin, query.max_distance_km));

        let mut page_query = CandidateQuery {
            exclude_user_id: query.requester_id,
            bounding_box,
            after_id: None,
            limit: self.page_size,
        };

        let mut candidates = Vec::new();
        loop {
            let page = store.list_other_profiles(&page_query).await?;
            let fetched = page.len();

            page_query.after_id = page.last().map(|p| p.id).or(page_query.after_id);
            candidates.extend(page);

            if fetched < page_query.limit {
                break;
            }
        }

        Ok(candidates)
    }
}
