use serde::{Deserialize, Serialize};

use crate::constants;

/// Which embedding provider backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// ONNX MiniLM via fastembed. First call may download and load the
    /// model; artifacts cache under `<data_dir>/models/`.
    FastEmbed,
    /// Deterministic hashed bag-of-words. Air-gapped installs and tests.
    Hashed,
}

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    /// Declared vector dimensionality. Stored in the meta row; a change
    /// clears persisted embeddings at startup.
    pub dimensions: usize,
    /// Seconds a provider failure stays sticky before init is retried.
    pub retry_window_secs: u64,
    /// Entries in the in-process embedding cache.
    pub cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::FastEmbed,
            dimensions: constants::DEFAULT_DIMENSIONS,
            retry_window_secs: constants::EMBED_RETRY_WINDOW_SECS,
            cache_size: 2048,
        }
    }
}
