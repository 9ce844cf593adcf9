mod loader;
mod store;

pub use loader::load;
pub use store::{Dataset, SimilarityMatrix};
