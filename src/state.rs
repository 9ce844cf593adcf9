use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::recommendations::Recommender;

/// Shared application state
///
/// `recommender` is `None` when the dataset failed to load at startup; the
/// service keeps serving and answers data endpoints with 503 instead.
#[derive(Clone)]
pub struct AppState {
    recommender: Option<Arc<Recommender>>,
}

impl AppState {
    pub fn new(recommender: Option<Arc<Recommender>>) -> Self {
        Self { recommender }
    }

    /// The recommender, or `DatasetUnavailable` when startup ran degraded
    pub fn recommender(&self) -> AppResult<&Arc<Recommender>> {
        self.recommender
            .as_ref()
            .ok_or_else(|| AppError::DatasetUnavailable("Movie data failed to load".to_string()))
    }
}
