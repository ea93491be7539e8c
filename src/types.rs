//! Core record types shared across the chunking and retrieval pipeline,
//! plus the crate-wide error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bounded, ordered segment of a source document produced by a chunker.
///
/// Chunk indices are strictly increasing per `source_id`, starting at 0.
/// A chunk is immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Unique identifier, derived from the source id and chunk index.
    pub id: String,
    /// Identifier of the document this chunk was cut from.
    pub source_id: String,
    /// Zero-based position of this chunk within the source.
    pub chunk_index: usize,
    /// The chunk text as it will be embedded.
    pub text: String,
}

impl TextChunk {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        chunk_index: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            chunk_index,
            text: text.into(),
        }
    }
}

/// An embedded chunk as held by a vector store, keyed uniquely by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub source_id: String,
    pub chunk_index: usize,
    pub text: String,
    /// The embedding vector.
    pub vector: Vec<f32>,
}

impl VectorRecord {
    pub fn new(chunk: &TextChunk, vector: Vec<f32>) -> Self {
        Self {
            id: chunk.id.clone(),
            source_id: chunk.source_id.clone(),
            chunk_index: chunk.chunk_index,
            text: chunk.text.clone(),
            vector,
        }
    }
}

/// A chunk returned from similarity search together with its score.
///
/// Ephemeral: produced by a search call and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub id: String,
    pub source_id: String,
    pub chunk_index: usize,
    pub text: String,
    /// Cosine similarity against the query vector, in `[-1, 1]`.
    pub score: f64,
}

/// Errors produced by the chunking and retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid constructor or caller-supplied options. Fatal at startup.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A proposed chunk plan failed partition/ordering validation.
    #[error("invalid chunk plan: {0}")]
    InvalidPlan(String),

    /// The embedding backend failed or returned an unusable result.
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// The language-model backend failed while answering.
    #[error("language model request failed: {0}")]
    Completion(String),

    /// The planning backend failed, timed out, or returned an unusable plan.
    #[error("chunk planning failed: {0}")]
    Planning(String),

    /// Vectors of unequal dimensionality were compared. Always a caller bug.
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The operation observed a cancellation signal and was abandoned.
    #[error("operation cancelled")]
    Cancelled,
}
