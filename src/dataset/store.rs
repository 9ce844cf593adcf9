use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::Movie;

/// Square row-major matrix of pairwise similarity scores
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Vec<f32>,
    dim: usize,
}

impl SimilarityMatrix {
    /// Builds a matrix from parsed rows, rejecting non-square input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dim = rows.len();
        let mut scores = Vec::with_capacity(dim * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(AppError::DatasetUnavailable(format!(
                    "Similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            scores.extend_from_slice(row);
        }
        Ok(Self { scores, dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row `i` as a borrowed slice: similarity of movie `i` to every movie
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.dim {
            return None;
        }
        Some(&self.scores[i * self.dim..(i + 1) * self.dim])
    }
}

/// Immutable movie catalog plus its similarity matrix
///
/// Built once at startup and shared read-only for the life of the process.
/// Duplicate titles resolve to the first occurrence in load order.
#[derive(Debug, Clone)]
pub struct Dataset {
    movies: Vec<Movie>,
    title_index: HashMap<String, usize>,
    matrix: SimilarityMatrix,
}

impl Dataset {
    pub fn new(movies: Vec<Movie>, matrix: SimilarityMatrix) -> AppResult<Self> {
        if matrix.dim() != movies.len() {
            return Err(AppError::DatasetUnavailable(format!(
                "Similarity matrix dimension {} does not match catalog size {}",
                matrix.dim(),
                movies.len()
            )));
        }

        let mut title_index = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            // First occurrence wins for duplicate titles
            title_index.entry(movie.title.clone()).or_insert(index);
        }

        Ok(Self {
            movies,
            title_index,
            matrix,
        })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Resolves a title to its catalog index
    pub fn lookup_by_title(&self, title: &str) -> AppResult<usize> {
        self.title_index.get(title).copied().ok_or_else(|| {
            AppError::NotFound(format!("No movie titled {:?} in the catalog", title))
        })
    }

    pub fn movie(&self, index: usize) -> AppResult<&Movie> {
        self.movies.get(index).ok_or(AppError::IndexOutOfRange {
            index,
            len: self.movies.len(),
        })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Similarity row for movie `index`
    pub fn row(&self, index: usize) -> AppResult<&[f32]> {
        self.matrix.row(index).ok_or(AppError::IndexOutOfRange {
            index,
            len: self.matrix.dim(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
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
                title: "A".to_string(),
            },
        ];
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.2],
            vec![0.9, 1.0, 0.4],
            vec![0.2, 0.4, 1.0],
        ])
        .unwrap();
        Dataset::new(movies, matrix).unwrap()
    }

    #[test]
    fn test_lookup_by_title_found() {
        let dataset = sample_dataset();
        assert_eq!(dataset.lookup_by_title("B").unwrap(), 1);
    }

    #[test]
    fn test_lookup_by_title_absent_is_not_found() {
        let dataset = sample_dataset();
        let result = dataset.lookup_by_title("Z");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_lookup_duplicate_title_resolves_to_first_occurrence() {
        let dataset = sample_dataset();
        assert_eq!(dataset.lookup_by_title("A").unwrap(), 0);
    }

    #[test]
    fn test_row_is_a_view_of_the_matrix() {
        let dataset = sample_dataset();
        assert_eq!(dataset.row(1).unwrap(), &[0.9, 1.0, 0.4]);
    }

    #[test]
    fn test_row_out_of_range() {
        let dataset = sample_dataset();
        let result = dataset.row(3);
        assert!(matches!(
            result,
            Err(AppError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_movie_out_of_range() {
        let dataset = sample_dataset();
        assert!(matches!(
            dataset.movie(7),
            Err(AppError::IndexOutOfRange { index: 7, len: 3 })
        ));
    }

    #[test]
    fn test_non_square_matrix_rejected() {
        let result = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]);
        assert!(matches!(result, Err(AppError::DatasetUnavailable(_))));
    }

    #[test]
    fn test_matrix_catalog_size_mismatch_rejected() {
        let movies = vec![Movie {
            id: 100,
            title: "A".to_string(),
        }];
        let matrix =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap();
        let result = Dataset::new(movies, matrix);
        assert!(matches!(result, Err(AppError::DatasetUnavailable(_))));
    }
}
