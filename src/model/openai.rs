//! OpenAI-compatible HTTP clients for embeddings and chat completion.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::{RagError, Result};
use crate::model::{ChatProvider, EmbeddingProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| RagError::UpstreamModel(format!("failed to build HTTP client: {e}")))
}

/// Map an HTTP error response to the crate taxonomy: authorization failures
/// are credential errors, everything else is an upstream failure.
async fn error_from_response(response: reqwest::Response) -> RagError {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return RagError::MissingCredential;
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    RagError::UpstreamModel(format!("API returned {status}: {detail}"))
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Embeddings ─────────────────────────────────────────────────────

/// [`EmbeddingProvider`] backed by an OpenAI-compatible `/embeddings`
/// endpoint.
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    /// Create a provider from settings.
    ///
    /// Fails with [`RagError::MissingCredential`] before any network call
    /// when no API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?.to_string();
        Ok(Self {
            client: build_http_client()?,
            api_base: settings.embedding.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: settings.embedding.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::UpstreamModel("embeddings API returned no data".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(target: "model", batch_size = texts.len(), model = %self.model, "embedding batch");

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::UpstreamModel(format!("embeddings request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::UpstreamModel(format!("invalid embeddings response: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(RagError::UpstreamModel(format!(
                "embeddings API returned {} vectors for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

// ── Chat completion ────────────────────────────────────────────────

/// [`ChatProvider`] backed by an OpenAI-compatible `/chat/completions`
/// endpoint.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiChat {
    /// Create a provider from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?.to_string();
        Ok(Self {
            client: build_http_client()?,
            api_base: settings.chat.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: settings.chat.model.clone(),
            temperature: settings.chat.temperature,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(target: "model", model = %self.model, prompt_len = prompt.len(), "chat completion");

        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::UpstreamModel(format!("chat request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagError::UpstreamModel(format!("invalid chat response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RagError::UpstreamModel("chat API returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_fails_before_network() {
        let settings = Settings {
            api_key: None,
            ..Settings::default()
        };
        assert!(matches!(
            OpenAiEmbeddings::from_settings(&settings),
            Err(RagError::MissingCredential)
        ));
        assert!(matches!(
            OpenAiChat::from_settings(&settings),
            Err(RagError::MissingCredential)
        ));
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let mut settings = Settings::default();
        settings.api_key = Some("sk-test".to_string());
        settings.embedding.api_base = "https://example.test/v1/".to_string();

        let provider = OpenAiEmbeddings::from_settings(&settings).unwrap();
        assert_eq!(provider.api_base, "https://example.test/v1");
    }
}
