//! # engram-embeddings
//!
//! The embedding capability behind the `Embedder` trait: an ONNX MiniLM
//! provider (fastembed) for production, a deterministic hashed provider for
//! air-gapped installs and tests, and an engine wrapper adding a content
//! cache and the model-state view for the status surface.

pub mod engine;
pub mod providers;

pub use engine::EmbeddingEngine;
pub use providers::fastembed_provider::FastEmbedProvider;
pub use providers::hashed::HashedEmbedder;
