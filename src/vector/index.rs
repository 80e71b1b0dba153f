//! In-memory vector index with nearest-neighbor search.

use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;

use crate::documents::Chunk;
use crate::error::{RagError, Result};
use crate::vector::{SimilarityMetric, cosine_similarity, persistence};

/// A chunk matched by a search, with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// An ordered collection of (chunk, vector) pairs supporting similarity
/// search.
///
/// Built once from the output of chunking and embedding; immutable after
/// construction. Ties in search scores are broken by insertion order.
#[derive(Debug)]
pub struct VectorIndex {
    metric: SimilarityMetric,
    dimension: usize,
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build an index from parallel chunk and vector sequences.
    ///
    /// Fails with [`RagError::EmptyIndex`] when no chunks are given, and
    /// [`RagError::DimensionMismatch`] when the vectors do not share one
    /// dimension.
    pub fn build(chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyIndex);
        }
        if chunks.len() != vectors.len() {
            return Err(RagError::Config(format!(
                "got {} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(RagError::Config(
                "embedding vectors must have a non-zero dimension".to_string(),
            ));
        }
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        Ok(Self {
            metric: SimilarityMetric::Cosine,
            dimension,
            chunks,
            vectors,
        })
    }

    /// Reassemble an index from persisted parts. Validation happens in
    /// [`persistence::load`].
    pub(crate) fn from_parts(
        metric: SimilarityMetric,
        dimension: usize,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Self {
        Self {
            metric,
            dimension,
            chunks,
            vectors,
        }
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding dimension this index was built with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub(crate) fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub(crate) fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Return up to `k` chunks ranked by descending similarity to
    /// `query_vector`. `k` larger than the index is clamped; ties keep
    /// insertion order.
    ///
    /// Fails with [`RagError::DimensionMismatch`] when the query dimension
    /// differs from the index dimension. The query is never truncated or
    /// padded.
    pub fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query_vector.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query_vector.len(),
            });
        }

        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .zip(&self.vectors)
            .map(|(chunk, vector)| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(query_vector, vector),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(k.min(self.chunks.len()));

        Ok(results)
    }

    /// Serialize the index durably. The write is atomic: data goes to a
    /// temporary file in the target directory which is then renamed over
    /// `path`, so a crash mid-save cannot corrupt a prior valid index.
    pub fn save(&self, path: &Path) -> Result<()> {
        persistence::save(self, path)
    }

    /// Load a persisted index.
    ///
    /// Fails with [`RagError::IndexNotFound`] when `path` is absent and
    /// [`RagError::CorruptIndex`] when the stored data fails integrity
    /// checks.
    pub fn load(path: &Path) -> Result<Self> {
        persistence::load(path)
    }
}
