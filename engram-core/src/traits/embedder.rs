use crate::errors::EngramResult;

/// Embedding capability: text in, unit-length vector out.
///
/// Implementations must be deterministic for a given text within the life
/// of the process and must return vectors of exactly `dimensions()`
/// elements. Failure means `EngramError::EmbedderUnavailable`; callers
/// degrade rather than abort.
pub trait Embedder: Send + Sync {
    /// Embed a single text. May block for seconds on the first call while
    /// a model loads; 5–50 ms afterwards.
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>>;

    /// Embed a batch of texts.
    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// The dimensionality this provider advertises.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Fast, non-blocking availability check used to pick degraded-mode
    /// behavior without triggering a heavy init.
    fn is_available(&self) -> bool;
}

impl<T: Embedder + ?Sized> Embedder for std::sync::Arc<T> {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        (**self).embed(text)
    }
    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }
    fn name(&self) -> &str {
        (**self).name()
    }
    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Cosine similarity as a plain dot product. Both inputs are expected to
/// be unit-length already; the result is clamped to [-1, 1].
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    dot.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_unit_vectors_score_one() {
        let v = vec![0.6f32, 0.8];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn mismatched_lengths_score_zero() {
        assert_eq!(cosine(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
