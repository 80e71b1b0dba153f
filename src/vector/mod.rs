//! Vector index: similarity search over embedded chunks plus durable
//! persistence.
//!
//! The index is built once per indexing run and loaded read-only at query
//! time. Cosine similarity is the fixed metric; it is recorded in the
//! persisted header so a future load can reject a mismatched store.

pub mod index;
pub mod persistence;

pub use index::{SearchResult, VectorIndex};

use serde::{Deserialize, Serialize};

/// Similarity metric an index was built with.
///
/// Queries must use the same metric as the build; the metric is part of the
/// persisted header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Cosine similarity: higher scores are more similar.
    Cosine,
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityMetric::Cosine => write!(f, "cosine"),
        }
    }
}

/// Cosine similarity between two vectors of equal dimension.
///
/// Returns 0.0 when either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
