//! Movie recommendation service: similarity ranking over a precomputed
//! matrix, with TMDB metadata enrichment behind a resilient cache.

pub mod config;
pub mod dataset;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
