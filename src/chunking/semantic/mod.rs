//! Planner-assisted chunking with a deterministic heuristic fallback.
//!
//! Text is split into heading-tagged paragraphs, grouped into chunks by an
//! external [`ChunkPlanner`], and the returned plan is validated as an exact,
//! in-order partition before use. Any planner failure — backend error,
//! timeout, invalid plan — falls back to greedy word-count grouping when
//! `fallback_on_error` is set, and is fatal for the document otherwise.

pub mod paragraphs;
pub mod plan;
pub mod planner;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::sentences::split_sentences;
use super::{TextChunker, count_words};
use crate::types::{RagError, TextChunk};

pub use paragraphs::{Paragraph, split_paragraphs};
pub use plan::{ChunkPlan, PlanItem, validate_plan};
pub use planner::ChunkPlanner;

/// Prompt wording handed to the planning collaborator.
#[derive(Clone, Debug)]
pub struct PlannerPromptOptions {
    pub system: String,
    /// User prompt lines; `{{targetWords}}`, `{{minWords}}`, `{{maxWords}}`,
    /// and `{{paragraphs}}` are substituted before the call.
    pub user_template: Vec<String>,
}

impl Default for PlannerPromptOptions {
    fn default() -> Self {
        Self {
            system: "You are a text segmentation engine. You never rewrite text. \
                     You only group paragraphs into ordered chunks. Return ONLY valid JSON."
                .to_string(),
            user_template: [
                "Group the paragraphs into coherent chunks for RAG retrieval.",
                "",
                "CONSTRAINTS:",
                "- Keep original paragraph order.",
                "- Use each paragraph exactly once.",
                "- Do not rewrite paragraph text.",
                "- Prefer splitting on topic changes and headings.",
                "- If a paragraph looks like a heading, keep it with the following content.",
                "- Target chunk size: {{targetWords}} words, min {{minWords}}, max {{maxWords}} (approximate).",
                "",
                "RETURN JSON ONLY in this schema:",
                "{ \"chunks\": [ { \"paragraphs\": [0,1,2], \"title\": \"optional\" } ] }",
                "",
                "PARAGRAPHS:",
                "{{paragraphs}}",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

/// Configuration for [`SemanticChunker`].
#[derive(Clone, Debug)]
pub struct SemanticChunkerOptions {
    /// Model identifier forwarded to the planning collaborator; opaque here.
    pub model: String,
    /// Upper bound on one planning call, enforced by the collaborator.
    pub request_timeout: Duration,
    /// Documents with more paragraphs than this never reach the planner.
    pub max_paragraphs_per_request: usize,
    /// Per-paragraph character cap applied when rendering the prompt.
    pub max_paragraph_chars: usize,
    pub target_words: usize,
    pub min_words: usize,
    pub max_words: usize,
    /// Trailing sentences of each chunk body carried into the next chunk.
    pub overlap_sentences: usize,
    pub include_header_prefix: bool,
    pub header_prefix_template: String,
    /// Recover from planner failures with the heuristic plan instead of
    /// failing the document.
    pub fallback_on_error: bool,
    pub prompt: PlannerPromptOptions,
}

impl Default for SemanticChunkerOptions {
    fn default() -> Self {
        Self {
            model: "qwen2.5:14b-instruct".to_string(),
            request_timeout: Duration::from_secs(60),
            max_paragraphs_per_request: 80,
            max_paragraph_chars: 1200,
            target_words: 700,
            min_words: 200,
            max_words: 1100,
            overlap_sentences: 2,
            include_header_prefix: true,
            header_prefix_template: "Section: {path}\n\n".to_string(),
            fallback_on_error: true,
            prompt: PlannerPromptOptions::default(),
        }
    }
}

impl SemanticChunkerOptions {
    fn validate(self) -> Result<Self, RagError> {
        if self.target_words == 0 {
            return Err(RagError::Configuration(
                "target_words must be positive".into(),
            ));
        }
        if self.max_words < self.target_words {
            return Err(RagError::Configuration(
                "max_words must be greater than or equal to target_words".into(),
            ));
        }
        Ok(self)
    }
}

/// Chunker that delegates paragraph grouping to an external planner and
/// falls back to deterministic word-count grouping on failure.
pub struct SemanticChunker {
    planner: Arc<dyn ChunkPlanner>,
    options: SemanticChunkerOptions,
}

impl SemanticChunker {
    pub fn new(
        planner: Arc<dyn ChunkPlanner>,
        options: SemanticChunkerOptions,
    ) -> Result<Self, RagError> {
        Ok(Self {
            planner,
            options: options.validate()?,
        })
    }

    pub fn options(&self) -> &SemanticChunkerOptions {
        &self.options
    }

    async fn plan_items(&self, paragraphs: &[Paragraph]) -> Result<Vec<PlanItem>, RagError> {
        if paragraphs.len() > self.options.max_paragraphs_per_request {
            if self.options.fallback_on_error {
                tracing::warn!(
                    paragraph_count = paragraphs.len(),
                    limit = self.options.max_paragraphs_per_request,
                    "paragraph count exceeds planner limit, using fallback plan"
                );
                return Ok(self.fallback_plan(paragraphs));
            }
            return Err(RagError::Planning(format!(
                "paragraph count {} exceeds max_paragraphs_per_request {}",
                paragraphs.len(),
                self.options.max_paragraphs_per_request
            )));
        }

        let planned = match self.planner.plan(paragraphs, &self.options).await {
            Ok(plan) => validate_plan(paragraphs.len(), &plan).map(|()| plan.chunks),
            Err(err) => Err(err),
        };

        match planned {
            Ok(items) => Ok(items),
            Err(err) if self.options.fallback_on_error => {
                tracing::warn!(error = %err, "chunk planning failed, using fallback plan");
                Ok(self.fallback_plan(paragraphs))
            }
            Err(err) => Err(err),
        }
    }

    /// Greedy word-count grouping: cut before a paragraph that would exceed
    /// `max_words`, cut after reaching `target_words`, and merge an
    /// undersized trailing item into its predecessor.
    fn fallback_plan(&self, paragraphs: &[Paragraph]) -> Vec<PlanItem> {
        let mut items: Vec<PlanItem> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut words = 0usize;

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let paragraph_words = count_words(&paragraph.text);

            if words + paragraph_words > self.options.max_words && !current.is_empty() {
                items.push(PlanItem::new(std::mem::take(&mut current)));
                words = 0;
            }

            current.push(index);
            words += paragraph_words;

            if words >= self.options.target_words {
                items.push(PlanItem::new(std::mem::take(&mut current)));
                words = 0;
            }
        }

        if !current.is_empty() {
            match items.last_mut() {
                Some(last) if words < self.options.min_words => {
                    last.paragraphs.append(&mut current);
                }
                _ => items.push(PlanItem::new(current)),
            }
        }

        items
    }

    fn build_chunk_text(&self, body: &str, header_path: &str) -> String {
        if !self.options.include_header_prefix || header_path.trim().is_empty() {
            return body.to_string();
        }

        let prefix = self
            .options
            .header_prefix_template
            .replace("{path}", header_path);
        format!("{prefix}{body}").trim().to_string()
    }

    fn build_overlap(&self, body: &str) -> String {
        if self.options.overlap_sentences == 0 {
            return String::new();
        }

        let sentences = split_sentences(body);
        if sentences.is_empty() {
            return String::new();
        }

        let take = self.options.overlap_sentences.min(sentences.len());
        sentences[sentences.len() - take..].join(" ")
    }
}

#[async_trait]
impl TextChunker for SemanticChunker {
    async fn chunk(&self, source_id: &str, text: &str) -> Result<Vec<TextChunk>, RagError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() {
            return Ok(Vec::new());
        }

        let items = self.plan_items(&paragraphs).await?;

        let mut chunks = Vec::new();
        let mut overlap = String::new();

        for (chunk_index, item) in items.iter().enumerate() {
            let mut indices = item.paragraphs.clone();
            indices.sort_unstable();

            let ordered: Vec<&Paragraph> = indices.iter().map(|&i| &paragraphs[i]).collect();
            let body = ordered
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");

            let body_with_overlap = if overlap.trim().is_empty() {
                body.clone()
            } else {
                format!("{overlap}\n\n{body}")
            };

            let header_path = ordered
                .iter()
                .find(|p| !p.heading_path.trim().is_empty())
                .map(|p| p.heading_path.as_str())
                .unwrap_or_default();

            let final_text = self.build_chunk_text(&body_with_overlap, header_path);

            chunks.push(TextChunk::new(
                format!("{source_id}::chunk::{chunk_index:05}"),
                source_id,
                chunk_index,
                final_text,
            ));

            overlap = self.build_overlap(&body);
        }

        tracing::debug!(
            source_id,
            chunk_count = chunks.len(),
            "semantic chunking complete"
        );

        Ok(chunks)
    }
}
