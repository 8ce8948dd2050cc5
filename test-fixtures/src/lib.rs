//! Test fixtures shared across the workspace: memory builders and a
//! deterministic embedder whose availability can be toggled to exercise
//! degraded paths.

use std::sync::atomic::{AtomicBool, Ordering};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::{Category, Confidence, Memory, Source};
use engram_core::traits::Embedder;

/// Deterministic one-hot-over-hashed-vocabulary embedder.
///
/// Shared tokens land in shared buckets, so texts with word overlap score
/// a predictable positive cosine. `set_available(false)` forces
/// `EmbedderUnavailable` to drive degraded-mode tests.
pub struct StubEmbedder {
    dimensions: usize,
    available: AtomicBool,
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }
}

impl Embedder for StubEmbedder {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(EngramError::EmbedderUnavailable);
        }
        let mut v = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| t.len() >= 2)
        {
            v[Self::hash_term(&token.to_lowercase(), self.dimensions)] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "stub-one-hot"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Current epoch milliseconds.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A committed-looking memory with sensible defaults, created "now" so
/// recency scoring sees a fresh row.
pub fn memory(id: &str, content: &str, namespace: &str) -> Memory {
    let now = now_ms();
    Memory {
        id: id.to_string(),
        content: content.to_string(),
        entity: None,
        category: Category::Fact,
        confidence: Confidence::new(0.8),
        embedding: None,
        source: Source::Manual,
        namespace: namespace.to_string(),
        tags: vec![],
        access_count: 0,
        decay_rate: 0.01,
        created_at: now,
        updated_at: now,
        last_accessed: None,
    }
}

/// Same, with an embedding from the given stub.
pub fn embedded_memory(
    id: &str,
    content: &str,
    namespace: &str,
    embedder: &StubEmbedder,
) -> Memory {
    let mut m = memory(id, content, namespace);
    m.embedding = Some(embedder.embed(content).expect("stub available"));
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::traits::cosine;

    #[test]
    fn stub_is_deterministic_and_unit_length() {
        let e = StubEmbedder::new(64);
        let a = e.embed("dark mode preference").unwrap();
        let b = e.embed("dark mode preference").unwrap();
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn word_overlap_scores_positive_cosine() {
        let e = StubEmbedder::new(64);
        let a = e.embed("I prefer dark mode").unwrap();
        let b = e.embed("what theme do I like, dark?").unwrap();
        assert!(cosine(&a, &b) > 0.0);
    }

    #[test]
    fn unavailable_stub_errors() {
        let e = StubEmbedder::new(8);
        e.set_available(false);
        assert!(!e.is_available());
        assert!(matches!(
            e.embed("x"),
            Err(EngramError::EmbedderUnavailable)
        ));
    }
}
