//! Embedding provider backed by Ollama's `/api/embeddings` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::OllamaOptions;
use crate::embeddings::EmbeddingProvider;
use crate::types::RagError;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

/// Requests embeddings from an Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaEmbeddingProvider {
    client: Client,
    options: OllamaOptions,
}

impl OllamaEmbeddingProvider {
    pub fn new(client: Client, options: OllamaOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Embedding(
                "text is required for embeddings".into(),
            ));
        }

        let url = self
            .options
            .endpoint("/api/embeddings")
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&EmbeddingRequest {
                model: &self.options.embedding_model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?
            .error_for_status()
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        if body.embedding.is_empty() {
            return Err(RagError::Embedding(
                "backend did not return an embedding".into(),
            ));
        }

        Ok(body.embedding)
    }
}
