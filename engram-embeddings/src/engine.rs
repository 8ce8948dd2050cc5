//! EmbeddingEngine — provider plus an in-process content cache, and the
//! model-state view for the status surface.

use std::path::Path;
use std::sync::Arc;

use moka::sync::Cache;

use engram_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use engram_core::errors::EngramResult;
use engram_core::models::ModelInfo;
use engram_core::traits::Embedder;

use crate::providers;

pub struct EmbeddingEngine {
    provider: Box<dyn Embedder>,
    cache: Cache<String, Arc<Vec<f32>>>,
    provider_kind: EmbeddingProviderKind,
    models_dir: std::path::PathBuf,
}

impl EmbeddingEngine {
    /// Build the engine from configuration. `models_dir` is where the
    /// neural provider caches artifacts.
    pub fn new(config: &EmbeddingConfig, models_dir: &Path) -> Self {
        let provider = providers::create_provider(config, models_dir);
        tracing::info!(
            provider = provider.name(),
            dims = config.dimensions,
            "embedding engine initialized"
        );
        Self {
            provider,
            cache: Cache::new(config.cache_size),
            provider_kind: config.provider,
            models_dir: models_dir.to_path_buf(),
        }
    }

    /// Wrap an explicit provider (tests inject deterministic doubles here).
    pub fn with_provider(provider: Box<dyn Embedder>, cache_size: u64) -> Self {
        Self {
            provider,
            cache: Cache::new(cache_size),
            provider_kind: EmbeddingProviderKind::Hashed,
            models_dir: std::path::PathBuf::new(),
        }
    }

    fn cache_key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Model state for `/api/status`.
    pub fn model_info(&self) -> ModelInfo {
        let (cached, size) = match self.provider_kind {
            EmbeddingProviderKind::FastEmbed => {
                crate::providers::fastembed_provider::cached_artifacts(&self.models_dir)
            }
            EmbeddingProviderKind::Hashed => (true, None),
        };
        ModelInfo {
            name: self.provider.name().to_string(),
            available: self.provider.is_available(),
            cached,
            size,
        }
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        let key = Self::cache_key(text);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.as_ref().clone());
        }
        let vector = self.provider.embed(text)?;
        self.cache.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts embed calls.
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl Embedder for CountingProvider {
        fn embed(&self, _text: &str) -> EngramResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0])
        }
        fn dimensions(&self) -> usize {
            2
        }
        fn name(&self) -> &str {
            "counting"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn repeated_text_hits_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = EmbeddingEngine::with_provider(
            Box::new(CountingProvider { calls: calls.clone() }),
            16,
        );

        engine.embed("same text").unwrap();
        engine.embed("same text").unwrap();
        engine.embed("other text").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn hashed_engine_reports_cached_model() {
        let engine = EmbeddingEngine::with_provider(
            Box::new(crate::HashedEmbedder::new(8)),
            16,
        );
        let info = engine.model_info();
        assert!(info.available);
        assert!(info.cached);
        assert_eq!(info.size, None);
    }
}
