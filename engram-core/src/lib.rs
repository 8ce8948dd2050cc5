//! # engram-core
//!
//! Foundation crate for the Engram memory service.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod models;
pub mod time;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::EngramConfig;
pub use errors::{EngramError, EngramResult};
pub use memory::{Category, Confidence, Memory, Source};
pub use models::{Contradiction, ContradictionStatus, ResolutionAction};
pub use traits::{Cancellable, CancellationToken, Embedder};
