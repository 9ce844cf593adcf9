//! Metadata enrichment: the TMDB client and the time-bounded cache over it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::models::MetadataRecord;

pub mod cache;
pub mod tmdb;

pub use cache::MetadataCache;
pub use tmdb::{RetryPolicy, TmdbClient};

/// Source of display metadata for a movie
///
/// The cache depends on this seam rather than on the concrete TMDB client,
/// so tests substitute counting or failing stubs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches metadata for one movie id
    async fn fetch(&self, movie_id: u64) -> AppResult<MetadataRecord>;
}

/// Time source for cache expiry, injectable so TTL tests advance time
/// without sleeping
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
