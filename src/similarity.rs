//! Bounded similarity scoring between embedding vectors.

use crate::types::RagError;

/// Computes cosine similarity between two vectors of equal dimensionality.
///
/// Accumulates in `f64` regardless of the `f32` storage type. Returns `0.0`
/// when either vector has zero magnitude or zero length, never NaN. Unequal
/// lengths are a [`RagError::DimensionMismatch`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, RagError> {
    if a.len() != b.len() {
        return Err(RagError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let mut dot = 0.0f64;
    let mut mag_a = 0.0f64;
    let mut mag_b = 0.0f64;

    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / denom)
}
