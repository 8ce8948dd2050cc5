//! Embedding providers.

pub mod fastembed_provider;
pub mod hashed;

use std::path::Path;

use engram_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use engram_core::traits::Embedder;

/// Build the provider selected by configuration.
pub fn create_provider(config: &EmbeddingConfig, models_dir: &Path) -> Box<dyn Embedder> {
    match config.provider {
        EmbeddingProviderKind::FastEmbed => Box::new(fastembed_provider::FastEmbedProvider::new(
            models_dir.to_path_buf(),
            config.dimensions,
            config.retry_window_secs,
        )),
        EmbeddingProviderKind::Hashed => Box::new(hashed::HashedEmbedder::new(config.dimensions)),
    }
}
