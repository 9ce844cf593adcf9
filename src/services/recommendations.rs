use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::{AppError, AppResult};
use crate::models::{Recommendation, RecommendationResult};
use crate::services::metadata::MetadataCache;
use crate::services::ranker::SimilarityRanker;

/// Neighbors returned when the caller does not ask for a specific count
pub const DEFAULT_NEIGHBORS: usize = 4;

/// Composes the similarity ranker and the metadata cache into display-ready
/// recommendation lists
pub struct Recommender {
    dataset: Arc<Dataset>,
    ranker: SimilarityRanker,
    cache: Arc<MetadataCache>,
}

impl Recommender {
    pub fn new(dataset: Arc<Dataset>, cache: Arc<MetadataCache>) -> Self {
        let ranker = SimilarityRanker::new(Arc::clone(&dataset));
        Self {
            dataset,
            ranker,
            cache,
        }
    }

    /// Returns the selected movie followed by its `k` nearest neighbors
    pub async fn recommend(&self, title: &str, k: usize) -> AppResult<RecommendationResult> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        let query_index = self.dataset.lookup_by_title(title)?;

        let mut indices = Vec::with_capacity(k + 1);
        indices.push(query_index);
        indices.extend(self.ranker.top_k(query_index, k)?);

        tracing::info!(
            title = %title,
            neighbors = indices.len() - 1,
            "Recommendations ranked"
        );

        self.enrich(indices).await
    }

    /// Returns the first `n` catalog movies in load order, enriched
    pub async fn top_n(&self, n: usize) -> AppResult<RecommendationResult> {
        let count = n.min(self.dataset.len());
        self.enrich((0..count).collect()).await
    }

    /// Fetches metadata for every index in parallel, preserving order
    async fn enrich(&self, indices: Vec<usize>) -> AppResult<RecommendationResult> {
        let mut tasks = Vec::with_capacity(indices.len());
        for index in indices {
            let movie = self.dataset.movie(index)?.clone();
            let cache = Arc::clone(&self.cache);
            tasks.push(tokio::spawn(async move {
                let metadata = cache.get(movie.id).await;
                Recommendation { movie, metadata }
            }));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await.map_err(|e| AppError::Internal(e.to_string()))?);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SimilarityMatrix;
    use crate::models::{MetadataRecord, Movie, Rating};
    use crate::services::metadata::MetadataProvider;
    use chrono::Utc;
    use std::time::Duration;

    struct StubProvider;

    #[async_trait::async_trait]
    impl MetadataProvider for StubProvider {
        async fn fetch(&self, movie_id: u64) -> AppResult<MetadataRecord> {
            Ok(MetadataRecord {
                title: format!("Movie {}", movie_id),
                poster_url: format!("https://posters.test/{}.jpg", movie_id),
                rating: Rating::Score(7.5),
                overview: "A film.".to_string(),
                fetched_at: Utc::now(),
            })
        }
    }

    fn recommender() -> Recommender {
        let movies = vec![
            Movie {
                id: 100,
                title: "A".to_string(),
            },
            Movie {
                id: 200,
                title: "B".to_string(),
            },
            Movie {
                id: 300,
                title: "C".to_string(),
            },
        ];
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.2],
            vec![0.9, 1.0, 0.4],
            vec![0.2, 0.4, 1.0],
        ])
        .unwrap();
        let dataset = Arc::new(Dataset::new(movies, matrix).unwrap());
        let cache = Arc::new(MetadataCache::new(
            Arc::new(StubProvider),
            Duration::from_secs(3600),
            Duration::from_secs(60),
        ));
        Recommender::new(dataset, cache)
    }

    #[tokio::test]
    async fn test_recommend_puts_query_movie_first() {
        let result = recommender().recommend("A", 1).await.unwrap();

        let ids: Vec<u64> = result.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![100, 200]);
    }

    #[tokio::test]
    async fn test_recommend_enriches_every_entry() {
        let result = recommender().recommend("A", 2).await.unwrap();

        assert_eq!(result.len(), 3);
        for entry in &result {
            assert_eq!(entry.metadata.title, format!("Movie {}", entry.movie.id));
            assert_eq!(entry.metadata.rating, Rating::Score(7.5));
        }
    }

    #[tokio::test]
    async fn test_recommend_unknown_title_is_not_found() {
        let result = recommender().recommend("Zardoz", 4).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_recommend_empty_title_is_invalid_input() {
        let result = recommender().recommend("  ", 4).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_recommend_clamps_oversized_k() {
        let result = recommender().recommend("A", 50).await.unwrap();
        let ids: Vec<u64> = result.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![100, 200, 300]);
    }

    #[tokio::test]
    async fn test_top_n_follows_catalog_order() {
        let result = recommender().top_n(2).await.unwrap();
        let ids: Vec<u64> = result.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![100, 200]);
    }

    #[tokio::test]
    async fn test_top_n_clamps_to_catalog_size() {
        let result = recommender().top_n(50).await.unwrap();
        assert_eq!(result.len(), 3);
    }
}
