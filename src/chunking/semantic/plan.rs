//! Chunk plan contract types and exact-partition validation.

use serde::{Deserialize, Serialize};

use crate::types::RagError;

/// An ordered grouping of paragraph indices into chunks, produced by a
/// planning collaborator or the deterministic fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    #[serde(default)]
    pub chunks: Vec<PlanItem>,
}

/// One planned chunk: the paragraph indices it covers and an optional title.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(default)]
    pub paragraphs: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PlanItem {
    pub fn new(paragraphs: Vec<usize>) -> Self {
        Self {
            paragraphs,
            title: None,
        }
    }
}

/// Verifies that `plan` is an exact, in-order partition of
/// `[0, paragraph_count)`: no gaps, no duplicates, no reordering, and no
/// empty chunks.
pub fn validate_plan(paragraph_count: usize, plan: &ChunkPlan) -> Result<(), RagError> {
    if plan.chunks.is_empty() {
        return Err(RagError::InvalidPlan("plan has no chunks".into()));
    }

    let mut seen = vec![false; paragraph_count];
    let mut last_index: Option<usize> = None;

    for (chunk_position, item) in plan.chunks.iter().enumerate() {
        if item.paragraphs.is_empty() {
            return Err(RagError::InvalidPlan(format!(
                "chunk {chunk_position} has no paragraphs"
            )));
        }

        for &index in &item.paragraphs {
            if index >= paragraph_count {
                return Err(RagError::InvalidPlan(format!(
                    "paragraph index {index} is out of range"
                )));
            }

            if seen[index] {
                return Err(RagError::InvalidPlan(format!(
                    "paragraph index {index} is duplicated"
                )));
            }

            if last_index.is_some_and(|last| index < last) {
                return Err(RagError::InvalidPlan(
                    "paragraph ordering is not monotonic".into(),
                ));
            }

            seen[index] = true;
            last_index = Some(index);
        }
    }

    if seen.iter().any(|assigned| !assigned) {
        return Err(RagError::InvalidPlan(
            "at least one paragraph was not assigned".into(),
        ));
    }

    Ok(())
}
