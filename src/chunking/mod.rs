//! Segmentation strategies that turn raw documents into bounded,
//! context-preserving chunks.
//!
//! Three interchangeable strategies implement [`TextChunker`]:
//!
//! * [`WordChunker`] — fixed-size sliding windows over whitespace tokens.
//! * [`AdaptiveSectionChunker`] — section- and paragraph-aware accumulation
//!   toward a target word count.
//! * [`SemanticChunker`] — delegates grouping to an external planner and
//!   falls back to a deterministic heuristic on failure.
//!
//! All strategies are deterministic for a given input and configuration,
//! stateless across calls, and safe to run concurrently across documents.

pub mod adaptive;
pub mod semantic;
pub mod sentences;
pub mod word;

use async_trait::async_trait;

use crate::types::{RagError, TextChunk};

pub use adaptive::{AdaptiveChunkerOptions, AdaptiveSectionChunker};
pub use semantic::{SemanticChunker, SemanticChunkerOptions};
pub use word::WordChunker;

/// Splits raw text into ordered chunks for downstream embedding and storage.
///
/// Re-invoking a chunker on the same input always restarts from the
/// beginning; the returned sequence is fully materialized and single-pass.
#[async_trait]
pub trait TextChunker: Send + Sync {
    /// Splits `text` into chunks tagged with `source_id` and sequential
    /// chunk indices starting at 0. Blank input yields an empty sequence.
    async fn chunk(&self, source_id: &str, text: &str) -> Result<Vec<TextChunk>, RagError>;
}

/// Number of whitespace-separated words in `text`.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
