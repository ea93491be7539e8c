//! Retrieves the most relevant chunks for a query.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::embeddings::EmbeddingProvider;
use crate::stores::VectorStore;
use crate::types::{RagError, ScoredChunk};

/// Embeds a query and ranks stored chunks against it.
pub struct Retriever {
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub const DEFAULT_TOP_K: usize = 5;
    pub const DEFAULT_THRESHOLD: f64 = 0.72;

    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embeddings, store }
    }

    /// Returns up to `top_k` chunks scoring at least `threshold` against
    /// the query. A blank query or zero `top_k` yields an empty result
    /// without contacting any collaborator.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        threshold: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredChunk>, RagError> {
        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embeddings.embed(query).await?;
        self.store
            .search(&query_vector, top_k, threshold, cancel)
            .await
    }
}
