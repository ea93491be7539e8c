//! Fixed-size sliding-window segmentation over whitespace tokens.

use async_trait::async_trait;

use super::TextChunker;
use crate::types::{RagError, TextChunk};

/// Splits text into windows of up to `window_words` words, advancing by
/// `window_words - overlap_words` each step. The final window may be shorter.
///
/// Deterministic and stateless across calls.
#[derive(Clone, Debug)]
pub struct WordChunker {
    window_words: usize,
    overlap_words: usize,
}

impl WordChunker {
    pub const DEFAULT_WINDOW_WORDS: usize = 180;
    pub const DEFAULT_OVERLAP_WORDS: usize = 40;

    /// Creates a chunker with the given window size and overlap.
    ///
    /// Fails on a zero window size. An overlap of `window_words` or more is
    /// clamped to `window_words - 1` so the window always advances.
    pub fn new(window_words: usize, overlap_words: usize) -> Result<Self, RagError> {
        if window_words == 0 {
            return Err(RagError::Configuration(
                "window size must be positive".into(),
            ));
        }

        Ok(Self {
            window_words,
            overlap_words: overlap_words.min(window_words - 1),
        })
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self {
            window_words: Self::DEFAULT_WINDOW_WORDS,
            overlap_words: Self::DEFAULT_OVERLAP_WORDS,
        }
    }
}

#[async_trait]
impl TextChunker for WordChunker {
    async fn chunk(&self, source_id: &str, text: &str) -> Result<Vec<TextChunk>, RagError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let step = (self.window_words - self.overlap_words).max(1);
        let mut chunks = Vec::new();
        let mut chunk_index = 0usize;
        let mut start = 0usize;

        while start < words.len() {
            let end = (start + self.window_words).min(words.len());
            let chunk_text = words[start..end].join(" ");

            chunks.push(TextChunk::new(
                format!("{source_id}::chunk::{chunk_index}"),
                source_id,
                chunk_index,
                chunk_text,
            ));

            chunk_index += 1;
            start += step;
        }

        Ok(chunks)
    }
}
