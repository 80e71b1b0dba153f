//! Shared test doubles for the network seams.

use async_trait::async_trait;

use ragline::error::Result;
use ragline::model::{ChatProvider, EmbeddingProvider};
use ragline::prompt::FALLBACK_ANSWER;

/// Small fixed vocabulary the stubs score against.
pub const VOCAB: [&str; 6] = ["paris", "france", "berlin", "germany", "capital", "oxide"];

/// Deterministic embedding stub: one dimension per vocabulary word plus a
/// constant slot so no text embeds to the zero vector. Texts sharing more
/// vocabulary land closer together under cosine similarity.
pub struct StubEmbeddings;

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        let mut vector = vec![0.0f32; VOCAB.len() + 1];
        for (i, word) in VOCAB.iter().enumerate() {
            vector[i] = lower.matches(word).count() as f32;
        }
        vector[VOCAB.len()] = 0.1;
        Ok(vector)
    }
}

/// Chat stub that honors the grounding instruction: it answers only when
/// the question's vocabulary appears in the supplied context, and emits the
/// fallback sentence verbatim otherwise.
pub struct StubChat;

#[async_trait]
impl ChatProvider for StubChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let context = prompt
            .split("Context:\n")
            .nth(1)
            .and_then(|s| s.split("\n\nQuestion:").next())
            .unwrap_or("")
            .to_lowercase();
        let question = prompt
            .split("Question: ")
            .nth(1)
            .and_then(|s| s.split('\n').next())
            .unwrap_or("")
            .to_lowercase();

        let grounded = VOCAB
            .iter()
            .any(|word| question.contains(word) && context.contains(word));

        if grounded {
            Ok(format!("Grounded answer to: {question}"))
        } else {
            Ok(FALLBACK_ANSWER.to_string())
        }
    }
}
