//! In-memory vector store with cosine similarity ranking.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::VectorStore;
use crate::similarity::cosine_similarity;
use crate::types::{RagError, ScoredChunk, VectorRecord};

/// Thread-safe in-memory record collection.
///
/// Writes hold an exclusive lock for the whole batch; reads copy a snapshot
/// under the lock and score outside it, so scoring never blocks writers.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: Mutex<Vec<VectorRecord>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        records: Vec<VectorRecord>,
        cancel: &CancellationToken,
    ) -> Result<(), RagError> {
        let mut live = self.records.lock();

        for record in records {
            if cancel.is_cancelled() {
                return Err(RagError::Cancelled);
            }

            match live.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => *existing = record,
                None => live.push(record),
            }
        }

        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        threshold: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredChunk>, RagError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let snapshot: Vec<VectorRecord> = self.records.lock().clone();

        let mut results = Vec::new();
        for record in snapshot {
            if cancel.is_cancelled() {
                return Err(RagError::Cancelled);
            }

            let score = cosine_similarity(query_vector, &record.vector)?;
            if score >= threshold {
                results.push(ScoredChunk {
                    id: record.id,
                    source_id: record.source_id,
                    chunk_index: record.chunk_index,
                    text: record.text,
                    score,
                });
            }
        }

        // Stable sort keeps snapshot order among equal scores.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        Ok(results)
    }
}
