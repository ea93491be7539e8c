//! Vector storage for embedded chunks.
//!
//! The [`VectorStore`] trait abstracts over storage implementations so the
//! indexing and retrieval pipeline is not tied to a specific backend. The
//! only backend provided here is the in-memory [`memory::InMemoryVectorStore`];
//! persistence across restarts is deliberately out of scope.

pub mod memory;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::{RagError, ScoredChunk, VectorRecord};

pub use memory::InMemoryVectorStore;

/// Persists and queries vectorized text chunks.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts records, replacing any existing record sharing an `id`.
    ///
    /// Mutations are serialized; cancellation is checked cooperatively once
    /// per record.
    async fn upsert(
        &self,
        records: Vec<VectorRecord>,
        cancel: &CancellationToken,
    ) -> Result<(), RagError>;

    /// Ranks stored records against `query_vector` by cosine similarity.
    ///
    /// Returns at most `top_k` results with `score >= threshold`, sorted
    /// descending by score with insertion order breaking ties. A `top_k` of
    /// zero yields an empty result without scoring anything.
    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        threshold: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredChunk>, RagError>;
}
