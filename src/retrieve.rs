//! Query-time retrieval and context assembly.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::documents::Chunk;
use crate::error::Result;
use crate::model::EmbeddingProvider;
use crate::vector::VectorIndex;

/// A chunk selected for a query, with its similarity score and 1-based rank.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub score: f32,
    pub rank: usize,
}

/// Embeds a query and searches a loaded index.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Return the `k` closest chunks to `query`, ranked best-first.
    ///
    /// The query must be embedded with the same model the index was built
    /// with; a changed model surfaces as
    /// [`RagError::DimensionMismatch`](crate::error::RagError::DimensionMismatch).
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        index: &VectorIndex,
    ) -> Result<Vec<RetrievedChunk>> {
        let query_vector = self.embedder.embed(query).await?;
        let results = index.search(&query_vector, k)?;

        debug!(target: "retrieve", results = results.len(), k, "retrieval complete");

        Ok(results
            .into_iter()
            .enumerate()
            .map(|(i, result)| RetrievedChunk {
                chunk: result.chunk,
                score: result.score,
                rank: i + 1,
            })
            .collect())
    }
}

/// Format retrieved chunks into a prompt-ready context block.
///
/// Each chunk becomes a numbered block with a source citation line followed
/// by the chunk text, blocks separated by blank lines, numbering starting at
/// 1 in rank order. Pure and deterministic.
pub fn assemble_context(results: &[RetrievedChunk]) -> String {
    let lines: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "[{}] Source: {}\n{}\n",
                r.rank,
                r.chunk.source.display(),
                r.chunk.content.trim_end()
            )
        })
        .collect();
    lines.join("\n")
}
