//! Grounded answering: retrieve, assemble, generate, cite.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::info;

use crate::error::Result;
use crate::model::{ChatProvider, EmbeddingProvider};
use crate::prompt;
use crate::retrieve::{RetrievedChunk, Retriever, assemble_context};
use crate::vector::VectorIndex;

/// A generated answer and the sources that grounded it.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The model's output text.
    pub text: String,

    /// Distinct source identifiers of the context chunks, in
    /// first-appearance rank order.
    pub sources: Vec<String>,
}

/// Orchestrates one query: retrieve context, build the grounding prompt,
/// invoke the generative model once, and collect citations.
pub struct Answerer {
    retriever: Retriever,
    chat: Arc<dyn ChatProvider>,
    top_k: usize,
}

impl Answerer {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder),
            chat,
            top_k,
        }
    }

    /// Answer `question` against a loaded index.
    ///
    /// Upstream failures propagate; there is no retry loop here.
    pub async fn answer(&self, question: &str, index: &VectorIndex) -> Result<Answer> {
        let results = self.retriever.retrieve(question, self.top_k, index).await?;

        let context = assemble_context(&results);
        let prompt = prompt::build_prompt(&context, question);

        let text = self.chat.generate(&prompt).await?;
        let sources = collect_sources(&results);

        info!(
            target: "answer",
            context_chunks = results.len(),
            sources = sources.len(),
            "answer generated"
        );

        Ok(Answer {
            text: text.trim().to_string(),
            sources,
        })
    }
}

/// Deduplicate source paths, keeping first-appearance rank order.
fn collect_sources(results: &[RetrievedChunk]) -> Vec<String> {
    let set: IndexSet<String> = results
        .iter()
        .map(|r| r.chunk.source.display().to_string())
        .collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Chunk;

    fn retrieved(rank: usize, source: &str) -> RetrievedChunk {
        RetrievedChunk {
            chunk: Chunk::new("text", source),
            score: 0.5,
            rank,
        }
    }

    #[test]
    fn test_collect_sources_dedups_in_rank_order() {
        let results = vec![
            retrieved(1, "b.txt"),
            retrieved(2, "a.txt"),
            retrieved(3, "b.txt"),
            retrieved(4, "c.txt"),
        ];

        assert_eq!(collect_sources(&results), vec!["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn test_collect_sources_empty() {
        assert!(collect_sources(&[]).is_empty());
    }
}
