use moka::future::{Cache, CacheBuilder};
use std::sync::Arc;
use std::time::Duration;
use crate::models::{CacheStats, RecommendationResult};

/// In-process cache of ranked recommendations per student
///
/// Entries expire after the configured TTL, so a freshly posted project shows
/// up at the latest one TTL later. Served entries are re-filtered against the
/// student's current applications and the clock by the caller.
#[derive(Clone)]
pub struct RecommendationCache {
    entries: Cache<String, Arc<Vec<RecommendationResult>>>,
    enabled: bool,
}

impl RecommendationCache {
    /// Create a new cache
    pub fn new(max_entries: u64, ttl_secs: u64, enabled: bool) -> Self {
        let entries = CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, enabled }
    }

    /// Get the cached recommendations for a student
    pub async fn get(&self, uid: &str) -> Option<Arc<Vec<RecommendationResult>>> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::recommendations(uid);
        let hit = self.entries.get(&key).await;
        tracing::trace!("Cache {}: {}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    /// Store a freshly computed ranking
    pub async fn insert(&self, uid: &str, recommendations: Vec<RecommendationResult>) -> Arc<Vec<RecommendationResult>> {
        let recommendations = Arc::new(recommendations);
        if self.enabled {
            let key = CacheKey::recommendations(uid);
            self.entries.insert(key.clone(), Arc::clone(&recommendations)).await;
            tracing::trace!("Cache set: {}", key);
        }
        recommendations
    }

    /// Drop a student's cached ranking
    pub async fn invalidate(&self, uid: &str) {
        self.entries.invalidate(&CacheKey::recommendations(uid)).await;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.enabled,
            entries: self.entries.entry_count(),
        }
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a student's recommendations
    pub fn recommendations(uid: &str) -> String {
        format!("recs:{}", uid)
    }
}
