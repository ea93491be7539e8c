//! Chat completion client backed by Ollama's `/api/chat` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::OllamaOptions;
use crate::llm::LlmClient;
use crate::types::RagError;

#[derive(Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

/// Sends answer prompts to an Ollama chat model.
#[derive(Clone, Debug)]
pub struct OllamaChatClient {
    client: Client,
    options: OllamaOptions,
}

impl OllamaChatClient {
    pub fn new(client: Client, options: OllamaOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl LlmClient for OllamaChatClient {
    async fn ask(&self, prompt: &str) -> Result<String, RagError> {
        if prompt.trim().is_empty() {
            return Ok(String::new());
        }

        let url = self
            .options
            .endpoint("/api/chat")
            .map_err(|err| RagError::Completion(err.to_string()))?;

        let request = ChatRequest {
            model: &self.options.chat_model,
            stream: false,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| RagError::Completion(err.to_string()))?
            .error_for_status()
            .map_err(|err| RagError::Completion(err.to_string()))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| RagError::Completion(err.to_string()))?;

        Ok(body.message.map(|m| m.content).unwrap_or_default())
    }
}
