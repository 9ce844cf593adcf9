pub mod metadata;
pub mod ranker;
pub mod recommendations;
