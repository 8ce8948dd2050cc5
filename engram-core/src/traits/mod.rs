//! Capability traits at the seams between subsystems.

mod cancellation;
mod embedder;

pub use cancellation::{Cancellable, CancellationToken};
pub use embedder::{cosine, Embedder};
