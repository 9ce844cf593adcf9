use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::RecommendationResult, state::AppState};

/// Listing size when the caller does not ask for a specific count
const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_n")]
    n: usize,
}

fn default_n() -> usize {
    DEFAULT_TOP_N
}

/// Handler for the popular-movies listing
pub async fn top(
    State(state): State<AppState>,
    Query(params): Query<TopQuery>,
) -> AppResult<Json<RecommendationResult>> {
    let result = state.recommender()?.top_n(params.n).await?;
    Ok(Json(result))
}
