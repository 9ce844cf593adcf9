use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::AppResult;

/// Ranks catalog movies by similarity to a query movie
///
/// Selection keeps a bounded min-heap over the query row, O(n log k)
/// instead of sorting the whole row.
pub struct SimilarityRanker {
    dataset: Arc<Dataset>,
}

/// A candidate neighbor. Orders by score, then by ascending index so equal
/// scores rank deterministically.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    index: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl SimilarityRanker {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Returns the `k` most similar movie indices, best first
    ///
    /// The query movie itself is never part of the result. A `k` larger
    /// than the rest of the catalog clamps instead of erroring.
    pub fn top_k(&self, query_index: usize, k: usize) -> AppResult<Vec<usize>> {
        let row = self.dataset.row(query_index)?;

        // Min-heap of the best k seen so far; the root is the current worst
        let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(k + 1);
        for (index, &score) in row.iter().enumerate() {
            if index == query_index {
                continue;
            }
            heap.push(Reverse(Candidate { score, index }));
            if heap.len() > k {
                heap.pop();
            }
        }

        let mut best: Vec<Candidate> = heap.into_iter().map(|Reverse(c)| c).collect();
        best.sort_unstable_by(|a, b| b.cmp(a));
        Ok(best.into_iter().map(|c| c.index).collect())
    }
}
