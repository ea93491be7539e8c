//! Planning collaborator contract for semantic chunking.

use async_trait::async_trait;

use super::SemanticChunkerOptions;
use super::paragraphs::Paragraph;
use super::plan::ChunkPlan;
use crate::types::RagError;

/// Plans semantic chunk boundaries over a set of paragraphs.
///
/// Implementations fail with [`RagError::Planning`] on backend failure,
/// timeout, an unparseable response, or an empty chunk list. Retry and
/// backoff are the implementation's concern; the chunker treats every
/// failure the same way.
#[async_trait]
pub trait ChunkPlanner: Send + Sync {
    async fn plan(
        &self,
        paragraphs: &[Paragraph],
        options: &SemanticChunkerOptions,
    ) -> Result<ChunkPlan, RagError>;
}
