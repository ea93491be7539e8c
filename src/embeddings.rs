//! Embedding collaborator contract and a deterministic mock for tests.

use async_trait::async_trait;

use crate::types::RagError;

/// Generates vector embeddings for input text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Computes an embedding for non-blank `text`.
    ///
    /// Fails with [`RagError::Embedding`] on backend failure or an empty
    /// result.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
}

/// Deterministic, offline embedding provider.
///
/// The same text always maps to the same vector, and different texts map to
/// different vectors with high probability, which is all retrieval tests
/// need. Not a semantic model.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub const DEFAULT_DIMENSIONS: usize = 32;

    pub fn new() -> Self {
        Self {
            dimensions: Self::DEFAULT_DIMENSIONS,
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Result<Self, RagError> {
        if dimensions == 0 {
            return Err(RagError::Configuration(
                "embedding dimensions must be positive".into(),
            ));
        }
        Ok(Self { dimensions })
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        // FNV-1a over the text, re-seeded per component.
        let mut vector = Vec::with_capacity(self.dimensions);
        for component in 0..self.dimensions {
            let mut hash = 0xcbf2_9ce4_8422_2325u64 ^ (component as u64).wrapping_mul(0x9e37_79b9);
            for byte in text.as_bytes() {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
            // Map into [-1, 1).
            let unit = (hash >> 11) as f64 / (1u64 << 53) as f64;
            vector.push((unit * 2.0 - 1.0) as f32);
        }
        vector
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Embedding(
                "text is required for embeddings".into(),
            ));
        }
        Ok(self.embed_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::new();

        let first = provider.embed("hello world").await.unwrap();
        let second = provider.embed("hello world").await.unwrap();
        let other = provider.embed("goodbye world").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.len(), MockEmbeddingProvider::DEFAULT_DIMENSIONS);
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let provider = MockEmbeddingProvider::new();
        assert!(matches!(
            provider.embed("   ").await,
            Err(RagError::Embedding(_))
        ));
    }

    #[test]
    fn zero_dimensions_is_rejected() {
        assert!(MockEmbeddingProvider::with_dimensions(0).is_err());
    }
}
