//! Ollama-backed collaborators: embeddings, chat completion, and chunk
//! planning over the local HTTP API.
//!
//! Each collaborator is a thin wrapper around one endpoint; retry and
//! backoff are left to callers. All requests share one [`reqwest::Client`].

pub mod chat;
pub mod embeddings;
pub mod planner;

use reqwest::Client;
use url::Url;

use crate::types::RagError;

pub use chat::OllamaChatClient;
pub use embeddings::OllamaEmbeddingProvider;
pub use planner::OllamaChunkPlanner;

/// Connection and model selection for an Ollama server.
#[derive(Clone, Debug)]
pub struct OllamaOptions {
    /// Base URL of the Ollama server.
    pub base_url: Url,
    /// Model used for `/api/embeddings` requests.
    pub embedding_model: String,
    /// Model used for `/api/chat` answer requests.
    pub chat_model: String,
}

impl Default for OllamaOptions {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:11434").expect("static url"),
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.1".to_string(),
        }
    }
}

impl OllamaOptions {
    /// Resolves an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, RagError> {
        self.base_url
            .join(path)
            .map_err(|err| RagError::Configuration(format!("invalid endpoint {path}: {err}")))
    }
}

/// Builds the HTTP client shared by the Ollama collaborators.
pub fn build_client() -> Result<Client, RagError> {
    Client::builder()
        .build()
        .map_err(|err| RagError::Configuration(format!("failed to build HTTP client: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_against_base_url() {
        let options = OllamaOptions::default();
        let url = options.endpoint("/api/embeddings").unwrap();
        assert_eq!(url.as_str(), "http://localhost:11434/api/embeddings");
    }

    #[test]
    fn defaults_match_local_server() {
        let options = OllamaOptions::default();
        assert_eq!(options.embedding_model, "nomic-embed-text");
        assert_eq!(options.chat_model, "llama3.1");
    }
}
