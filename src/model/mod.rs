//! External model providers.
//!
//! The embedding and generative models are network services. Both are
//! reached through single-method traits so the retrieval pipeline can be
//! exercised with deterministic stubs in tests.

pub mod openai;

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-dimension embedding vectors.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; providers with native
/// batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// Turns a prompt into generated text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one generation call. Errors are propagated, never retried here.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
