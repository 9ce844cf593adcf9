use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base URL for TMDB poster images
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Poster shown when TMDB has no image for a movie
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Poster shown when the metadata fetch itself failed
pub const ERROR_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=Error+Loading+Poster";

/// Overview text when TMDB omits one or the fetch failed
pub const FALLBACK_OVERVIEW: &str = "Information temporarily unavailable.";

/// Title shown when TMDB omits one
pub const FALLBACK_TITLE: &str = "N/A";

/// A movie in the precomputed catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// TMDB movie id
    pub id: u64,
    pub title: String,
}

/// Audience rating as rendered to clients: a number, or `"unavailable"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    Unavailable,
}

impl Rating {
    /// Builds a rating from TMDB's `vote_average` field, rounded to one
    /// decimal place. Non-numeric values count as unavailable.
    pub fn from_vote_average(value: Option<&serde_json::Value>) -> Self {
        match value.and_then(|v| v.as_f64()) {
            Some(score) => Rating::Score((score * 10.0).round() / 10.0),
            None => Rating::Unavailable,
        }
    }
}

impl Serialize for Rating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Rating::Score(score) => serializer.serialize_f64(*score),
            Rating::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value.as_f64() {
            Some(score) => Ok(Rating::Score(score)),
            None if value.as_str() == Some("unavailable") => Ok(Rating::Unavailable),
            _ => Err(serde::de::Error::custom(
                "expected a number or the string \"unavailable\"",
            )),
        }
    }
}

/// Display metadata for one movie, fetched from TMDB or built as a fallback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataRecord {
    pub title: String,
    pub poster_url: String,
    pub rating: Rating,
    pub overview: String,
    pub fetched_at: DateTime<Utc>,
}

impl MetadataRecord {
    /// Fallback record served when every fetch attempt failed
    pub fn degraded(fetched_at: DateTime<Utc>) -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            poster_url: ERROR_POSTER_URL.to_string(),
            rating: Rating::Unavailable,
            overview: FALLBACK_OVERVIEW.to_string(),
            fetched_at,
        }
    }
}

/// One entry in a recommendation response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub metadata: MetadataRecord,
}

/// Ordered, display-ready recommendation list
pub type RecommendationResult = Vec<Recommendation>;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie details response from TMDB
///
/// Every field is optional: partial responses use per-field fallbacks
/// instead of failing the fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Kept as raw JSON: TMDB has been observed returning non-numeric values
    #[serde(default)]
    pub vote_average: Option<serde_json::Value>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl TmdbMovieDetails {
    /// Applies per-field fallbacks to produce a renderable record
    pub fn into_record(self, fetched_at: DateTime<Utc>) -> MetadataRecord {
        let poster_url = match self.poster_path {
            Some(path) => format!("{}{}", POSTER_BASE_URL, path),
            None => PLACEHOLDER_POSTER_URL.to_string(),
        };

        MetadataRecord {
            title: self.title.unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            poster_url,
            rating: Rating::from_vote_average(self.vote_average.as_ref()),
            overview: self
                .overview
                .unwrap_or_else(|| FALLBACK_OVERVIEW.to_string()),
            fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_rounds_to_one_decimal() {
        let value = json!(8.456);
        assert_eq!(
            Rating::from_vote_average(Some(&value)),
            Rating::Score(8.5)
        );
    }

    #[test]
    fn test_rating_integer_vote_average() {
        let value = json!(7);
        assert_eq!(Rating::from_vote_average(Some(&value)), Rating::Score(7.0));
    }

    #[test]
    fn test_rating_non_numeric_is_unavailable() {
        let value = json!("not rated");
        assert_eq!(Rating::from_vote_average(Some(&value)), Rating::Unavailable);
        assert_eq!(Rating::from_vote_average(None), Rating::Unavailable);
    }

    #[test]
    fn test_rating_serializes_as_number_or_string() {
        assert_eq!(serde_json::to_string(&Rating::Score(7.8)).unwrap(), "7.8");
        assert_eq!(
            serde_json::to_string(&Rating::Unavailable).unwrap(),
            "\"unavailable\""
        );
    }

    #[test]
    fn test_rating_deserializes_both_forms() {
        let score: Rating = serde_json::from_str("7.8").unwrap();
        assert_eq!(score, Rating::Score(7.8));

        let unavailable: Rating = serde_json::from_str("\"unavailable\"").unwrap();
        assert_eq!(unavailable, Rating::Unavailable);

        let invalid: Result<Rating, _> = serde_json::from_str("\"great\"");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_into_record_full_response() {
        let details: TmdbMovieDetails = serde_json::from_value(json!({
            "title": "Inception",
            "poster_path": "/qmDpIHrmpJINaRKAfWQfftjCdyi.jpg",
            "vote_average": 8.364,
            "overview": "A thief who steals corporate secrets."
        }))
        .unwrap();

        let record = details.into_record(Utc::now());
        assert_eq!(record.title, "Inception");
        assert_eq!(
            record.poster_url,
            "https://image.tmdb.org/t/p/w500/qmDpIHrmpJINaRKAfWQfftjCdyi.jpg"
        );
        assert_eq!(record.rating, Rating::Score(8.4));
        assert_eq!(record.overview, "A thief who steals corporate secrets.");
    }

    #[test]
    fn test_into_record_partial_response_uses_fallbacks() {
        let details: TmdbMovieDetails = serde_json::from_value(json!({})).unwrap();

        let record = details.into_record(Utc::now());
        assert_eq!(record.title, FALLBACK_TITLE);
        assert_eq!(record.poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(record.rating, Rating::Unavailable);
        assert_eq!(record.overview, FALLBACK_OVERVIEW);
    }

    #[test]
    fn test_degraded_record() {
        let now = Utc::now();
        let record = MetadataRecord::degraded(now);
        assert_eq!(record.poster_url, ERROR_POSTER_URL);
        assert_eq!(record.rating, Rating::Unavailable);
        assert_eq!(record.overview, FALLBACK_OVERVIEW);
        assert_eq!(record.fetched_at, now);
    }
}
