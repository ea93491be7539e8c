//! Chunk planner that delegates grouping decisions to an Ollama chat model.

use async_trait::async_trait;
use reqwest::Client;

use super::OllamaOptions;
use super::chat::{ChatMessage, ChatRequest, ChatResponse};
use crate::chunking::semantic::paragraphs::Paragraph;
use crate::chunking::semantic::plan::ChunkPlan;
use crate::chunking::semantic::planner::ChunkPlanner;
use crate::chunking::semantic::SemanticChunkerOptions;
use crate::types::RagError;

/// Asks an Ollama chat model to group paragraphs into a [`ChunkPlan`].
///
/// The model is instructed to return only the documented JSON schema; any
/// deviation is a [`RagError::Planning`] for the caller (typically the
/// semantic chunker, which may fall back).
#[derive(Clone, Debug)]
pub struct OllamaChunkPlanner {
    client: Client,
    options: OllamaOptions,
}

impl OllamaChunkPlanner {
    pub fn new(client: Client, options: OllamaOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl ChunkPlanner for OllamaChunkPlanner {
    async fn plan(
        &self,
        paragraphs: &[Paragraph],
        options: &SemanticChunkerOptions,
    ) -> Result<ChunkPlan, RagError> {
        if paragraphs.is_empty() {
            return Err(RagError::Planning("no paragraphs to plan".into()));
        }

        if options.max_paragraphs_per_request > 0
            && paragraphs.len() > options.max_paragraphs_per_request
        {
            return Err(RagError::Planning(format!(
                "paragraph count {} exceeds max_paragraphs_per_request {}",
                paragraphs.len(),
                options.max_paragraphs_per_request
            )));
        }

        let url = self
            .options
            .endpoint("/api/chat")
            .map_err(|err| RagError::Planning(err.to_string()))?;

        let user_prompt = build_user_prompt(paragraphs, options);
        let request = ChatRequest {
            model: &options.model,
            stream: false,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &options.prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let mut builder = self.client.post(url).json(&request);
        if !options.request_timeout.is_zero() {
            builder = builder.timeout(options.request_timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| RagError::Planning(err.to_string()))?
            .error_for_status()
            .map_err(|err| RagError::Planning(err.to_string()))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| RagError::Planning(err.to_string()))?;

        let content = body.message.map(|m| m.content).unwrap_or_default();
        if content.trim().is_empty() {
            return Err(RagError::Planning("planner returned empty content".into()));
        }

        let plan: ChunkPlan = serde_json::from_str(&content)
            .map_err(|err| RagError::Planning(format!("planner returned invalid JSON: {err}")))?;

        if plan.chunks.is_empty() {
            return Err(RagError::Planning("planner returned no chunks".into()));
        }

        Ok(plan)
    }
}

fn build_user_prompt(paragraphs: &[Paragraph], options: &SemanticChunkerOptions) -> String {
    let paragraphs_block = format_paragraphs(paragraphs, options.max_paragraph_chars);

    options
        .prompt
        .user_template
        .join("\n")
        .replace("{{targetWords}}", &options.target_words.to_string())
        .replace("{{minWords}}", &options.min_words.to_string())
        .replace("{{maxWords}}", &options.max_words.to_string())
        .replace("{{paragraphs}}", &paragraphs_block)
}

/// Renders each paragraph as `p{i}: """{text}"""`, truncating the text to
/// `max_chars` characters when the cap is nonzero.
fn format_paragraphs(paragraphs: &[Paragraph], max_chars: usize) -> String {
    let mut block = String::new();

    for (i, paragraph) in paragraphs.iter().enumerate() {
        let text: &str = if max_chars > 0 {
            match paragraph.text.char_indices().nth(max_chars) {
                Some((byte_index, _)) => &paragraph.text[..byte_index],
                None => &paragraph.text,
            }
        } else {
            &paragraph.text
        };

        block.push_str(&format!("p{i}: \"\"\"{text}\"\"\"\n"));
    }

    block
}
