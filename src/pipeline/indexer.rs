//! Coordinates chunking and embedding to index text into a vector store.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::chunking::TextChunker;
use crate::embeddings::EmbeddingProvider;
use crate::stores::VectorStore;
use crate::types::{RagError, VectorRecord};

/// Turns raw text into stored embedded records using a chunker and an
/// embedding collaborator.
pub struct Indexer {
    chunker: Arc<dyn TextChunker>,
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Indexer {
    pub fn new(
        chunker: Arc<dyn TextChunker>,
        embeddings: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            chunker,
            embeddings,
            store,
        }
    }

    /// Chunks, embeds, and upserts the provided text.
    ///
    /// All-or-nothing per call: every chunk is embedded sequentially with a
    /// cancellation check in between, and the records reach the store in
    /// exactly one upsert at the end. Any embedding failure discards the
    /// whole batch. Blank text is a no-op; a blank `source_id` is an error.
    pub async fn index_text(
        &self,
        source_id: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<(), RagError> {
        if source_id.trim().is_empty() {
            return Err(RagError::Configuration("source id is required".into()));
        }

        if text.trim().is_empty() {
            return Ok(());
        }

        let chunks = self.chunker.chunk(source_id, text).await?;

        let mut records = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            if cancel.is_cancelled() {
                return Err(RagError::Cancelled);
            }

            let vector = self.embeddings.embed(&chunk.text).await?;
            records.push(VectorRecord::new(chunk, vector));
        }

        if !records.is_empty() {
            let count = records.len();
            self.store.upsert(records, cancel).await?;
            tracing::debug!(source_id, chunk_count = count, "indexed document");
        }

        Ok(())
    }
}
