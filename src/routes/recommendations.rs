use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult, models::RecommendationResult,
    services::recommendations::DEFAULT_NEIGHBORS, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    title: String,
    #[serde(default = "default_k")]
    k: usize,
}

fn default_k() -> usize {
    DEFAULT_NEIGHBORS
}

/// Handler for the similar-movies endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResult>> {
    let result = state
        .recommender()?
        .recommend(&params.title, params.k)
        .await?;
    Ok(Json(result))
}
