//! Language-model collaborator contract.

use async_trait::async_trait;

use crate::types::RagError;

/// Sends prompts to a language model and returns its answer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` and returns the model's answer verbatim.
    ///
    /// A blank prompt yields an empty answer without contacting the backend.
    /// Backend failures surface as [`RagError::Completion`].
    async fn ask(&self, prompt: &str) -> Result<String, RagError>;
}
