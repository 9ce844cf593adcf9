//! Time-bounded, stampede-safe metadata cache.
//!
//! Callers always get a renderable record: upstream failures are absorbed
//! into degraded entries rather than surfaced. Degraded entries carry a
//! shorter TTL than fresh ones, so a recovering upstream is retried soon
//! without being hammered while it is down.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::models::MetadataRecord;

use super::{Clock, MetadataProvider, SystemClock};

/// One cached record plus its expiry
#[derive(Debug, Clone)]
struct CacheEntry {
    record: MetadataRecord,
    expires_at: DateTime<Utc>,
}

type EntrySlot = Arc<Mutex<Option<CacheEntry>>>;

/// Memoizes `MetadataProvider::fetch` results per movie id
pub struct MetadataCache {
    provider: Arc<dyn MetadataProvider>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    degraded_ttl: chrono::Duration,
    /// Resolves ids to per-key slots; locked only briefly, never across a
    /// fetch
    entries: Mutex<HashMap<u64, EntrySlot>>,
}

impl MetadataCache {
    pub fn new(provider: Arc<dyn MetadataProvider>, ttl: Duration, degraded_ttl: Duration) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock), ttl, degraded_ttl)
    }

    pub fn with_clock(
        provider: Arc<dyn MetadataProvider>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        degraded_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            clock,
            ttl: chrono::Duration::seconds(ttl.as_secs() as i64),
            degraded_ttl: chrono::Duration::seconds(degraded_ttl.as_secs() as i64),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns display metadata for `movie_id`, fetching on miss or expiry
    ///
    /// Concurrent calls for the same uncached id coalesce into a single
    /// provider invocation; other ids proceed independently.
    pub async fn get(&self, movie_id: u64) -> MetadataRecord {
        let slot = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(movie_id).or_default())
        };

        // Holders of the per-key lock serialize, so at most one fetch per id
        // is ever outstanding and late arrivals see the winner's entry.
        let mut entry = slot.lock().await;
        let now = self.clock.now();

        if let Some(cached) = entry.as_ref() {
            if now < cached.expires_at {
                return cached.record.clone();
            }
            tracing::debug!(movie_id, "Metadata cache entry expired");
        }

        let (record, ttl) = match self.provider.fetch(movie_id).await {
            Ok(record) => (record, self.ttl),
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    error = %e,
                    "Metadata fetch failed, serving degraded record"
                );
                (MetadataRecord::degraded(now), self.degraded_ttl)
            }
        };

        *entry = Some(CacheEntry {
            record: record.clone(),
            expires_at: now + ttl,
        });

        record
    }
}
