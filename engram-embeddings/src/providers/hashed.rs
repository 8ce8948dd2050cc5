//! Deterministic hashed bag-of-words provider.
//!
//! Produces fixed-dimension unit vectors by hashing terms into buckets and
//! weighting by term frequency. Not as semantically rich as the neural
//! provider, but always available and fully reproducible: the provider of
//! record for air-gapped installs and scoring tests.

use std::collections::HashMap;

use engram_core::errors::EngramResult;
use engram_core::traits::Embedder;

pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Hash a term into a bucket index using FNV-1a.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    /// Tokenize text into lowercase alphanumeric terms.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];

        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms carry more signal than near-stopwords.
            let weight = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimensions);
            vec[bucket] += freq * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl Embedder for HashedEmbedder {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-bow"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::traits::cosine;

    #[test]
    fn empty_text_returns_zero_vector() {
        let p = HashedEmbedder::new(128);
        let v = p.embed("").unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn produces_declared_dimensions() {
        let p = HashedEmbedder::new(384);
        assert_eq!(p.embed("hello world").unwrap().len(), 384);
    }

    #[test]
    fn output_is_unit_length() {
        let p = HashedEmbedder::new(256);
        let v = p.embed("rust memory service daemon").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn deterministic_within_process() {
        let p = HashedEmbedder::new(256);
        assert_eq!(p.embed("same text").unwrap(), p.embed("same text").unwrap());
    }

    #[test]
    fn batch_matches_individual() {
        let p = HashedEmbedder::new(128);
        let texts = vec!["hello world".to_string(), "foo bar baz".to_string()];
        let batch = p.embed_batch(&texts).unwrap();
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(batch[i], p.embed(text).unwrap());
        }
    }

    #[test]
    fn similar_texts_score_higher() {
        let p = HashedEmbedder::new(256);
        let a = p.embed("I prefer dark mode themes").unwrap();
        let b = p.embed("dark mode is my preference").unwrap();
        let c = p.embed("quarterly revenue projections").unwrap();
        assert!(cosine(&a, &b) > cosine(&a, &c));
    }
}
