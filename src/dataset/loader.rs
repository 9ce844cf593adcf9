//! Loads the movie catalog and similarity matrix from disk.
//!
//! Loading is all-or-nothing: a missing or malformed artifact surfaces as a
//! single `DatasetUnavailable` and nothing is partially initialized.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::Movie;

use super::store::{Dataset, SimilarityMatrix};

/// One record of the catalog artifact
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    movie_id: u64,
    title: String,
}

/// Loads the dataset from the catalog and matrix artifacts
pub fn load(catalog_path: &str, matrix_path: &str) -> AppResult<Dataset> {
    let entries: Vec<CatalogEntry> = parse(Path::new(catalog_path))?;
    let movies = entries
        .into_iter()
        .map(|e| Movie {
            id: e.movie_id,
            title: e.title,
        })
        .collect();

    let rows: Vec<Vec<f32>> = parse(Path::new(matrix_path))?;
    let matrix = SimilarityMatrix::from_rows(rows)?;

    let dataset = Dataset::new(movies, matrix)?;

    tracing::info!(movies = dataset.len(), "Dataset loaded");

    Ok(dataset)
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let reader = open(path)?;
    serde_json::from_reader(reader).map_err(|e| {
        AppError::DatasetUnavailable(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn open(path: &Path) -> AppResult<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        AppError::DatasetUnavailable(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    // A .gz suffix means the artifact was gzip-compressed on export
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}
