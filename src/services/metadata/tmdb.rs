//! TMDB metadata client.
//!
//! One logical fetch runs up to `max_attempts` transport attempts, retrying
//! transient failures (retryable statuses, connect errors, timeouts) with
//! exponential backoff. Non-transient failures fail the fetch immediately.
//! The client reports `FetchFailed` and never synthesizes placeholder data;
//! degradation policy lives in the cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client as HttpClient, StatusCode};

use crate::error::{AppError, AppResult};
use crate::models::{MetadataRecord, TmdbMovieDetails};

use super::MetadataProvider;

/// Retry behavior for TMDB calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per subsequent retry
    pub backoff_base: Duration,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Server statuses worth retrying
    pub retryable_statuses: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            timeout: Duration::from_secs(5),
            retryable_statuses: vec![
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::BAD_GATEWAY,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::GATEWAY_TIMEOUT,
            ],
        }
    }
}

impl RetryPolicy {
    fn is_retryable(&self, status: StatusCode) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.pow(attempt.saturating_sub(1))
    }
}

/// Outcome of a single transport attempt
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Failure of a single attempt, before any retry decision
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    fn is_transient(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Connect(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// One HTTP attempt, no retries
///
/// Split out of the client so the retry policy is testable against a
/// scripted stub instead of a live endpoint.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Clone, Default)]
pub struct HttpTransport {
    http_client: HttpClient,
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, TransportError> {
        let response = self.http_client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

/// TMDB movie-details client
pub struct TmdbClient {
    transport: Arc<dyn Transport>,
    api_key: String,
    api_url: String,
    policy: RetryPolicy,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self::with_transport(
            Arc::new(HttpTransport::default()),
            api_key,
            api_url,
            RetryPolicy::default(),
        )
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        api_key: String,
        api_url: String,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            api_key,
            api_url,
            policy,
        }
    }

    // The key rides in the query string, so the URL itself must stay out of
    // logs.
    fn endpoint(&self, movie_id: u64) -> String {
        format!(
            "{}/movie/{}?api_key={}&language=en-US",
            self.api_url, movie_id, self.api_key
        )
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn fetch(&self, movie_id: u64) -> AppResult<MetadataRecord> {
        let url = self.endpoint(movie_id);

        let mut attempt = 1;
        loop {
            match self.transport.get(&url, self.policy.timeout).await {
                Ok(response) if response.status.is_success() => {
                    let details: TmdbMovieDetails = serde_json::from_str(&response.body)
                        .map_err(|e| {
                            AppError::FetchFailed(format!("Malformed TMDB response: {}", e))
                        })?;

                    tracing::debug!(movie_id, attempt, "Movie metadata fetched");

                    return Ok(details.into_record(Utc::now()));
                }
                Ok(response) if self.policy.is_retryable(response.status) => {
                    if attempt >= self.policy.max_attempts {
                        return Err(AppError::FetchFailed(format!(
                            "TMDB returned status {} after {} attempts",
                            response.status, attempt
                        )));
                    }
                    let delay = self.policy.backoff_delay(attempt);
                    tracing::warn!(
                        movie_id,
                        status = %response.status,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient TMDB failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    // Client-side statuses are not worth retrying
                    return Err(AppError::FetchFailed(format!(
                        "TMDB returned status {}",
                        response.status
                    )));
                }
                Err(e) if e.is_transient() => {
                    if attempt >= self.policy.max_attempts {
                        return Err(AppError::FetchFailed(format!(
                            "TMDB unreachable after {} attempts: {}",
                            attempt, e
                        )));
                    }
                    let delay = self.policy.backoff_delay(attempt);
                    tracing::warn!(
                        movie_id,
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient TMDB failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(AppError::FetchFailed(e.to_string())),
            }
            attempt += 1;
        }
    }
}
