//! End-to-end orchestration: retrieve context, build a prompt, ask the LLM.

use std::fmt::Write as _;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::Retriever;
use crate::llm::LlmClient;
use crate::types::RagError;

/// Fixed reply for a blank question.
pub const EMPTY_QUESTION_ANSWER: &str = "Empty question.";
/// Fixed reply when nothing scores above the retrieval threshold.
pub const NO_CONTEXT_ANSWER: &str = "No context found -> I don't know.";

/// Answers questions from retrieved context with a strict context-only
/// policy.
pub struct RagService {
    retriever: Arc<Retriever>,
    llm: Arc<dyn LlmClient>,
    top_k: usize,
    threshold: f64,
}

impl RagService {
    pub fn new(
        retriever: Arc<Retriever>,
        llm: Arc<dyn LlmClient>,
        top_k: usize,
        threshold: f64,
    ) -> Self {
        Self {
            retriever,
            llm,
            top_k,
            threshold,
        }
    }

    /// Answers `question` using retrieved context.
    ///
    /// A blank question or an empty retrieval result short-circuits to a
    /// fixed message without contacting the language model; otherwise the
    /// model's answer is returned verbatim.
    pub async fn ask(&self, question: &str, cancel: &CancellationToken) -> Result<String, RagError> {
        if question.trim().is_empty() {
            return Ok(EMPTY_QUESTION_ANSWER.to_string());
        }

        let retrieved = self
            .retriever
            .retrieve(question, self.top_k, self.threshold, cancel)
            .await?;

        if retrieved.is_empty() {
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let mut context = String::new();
        for chunk in &retrieved {
            let _ = writeln!(context, "[score:{:.4}] {}", chunk.score, chunk.text);
        }

        let prompt = format!(
            "Use only the context below. If the context is missing or insufficient, \
             answer with \"I don't know\".\n\
             Context:\n{context}\n\
             Question:\n{question}\n\
             Answer:"
        );

        tracing::debug!(
            question,
            context_chunks = retrieved.len(),
            prompt_chars = prompt.len(),
            "asking language model"
        );

        self.llm.ask(&prompt).await
    }
}
