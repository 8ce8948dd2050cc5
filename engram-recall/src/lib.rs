//! # engram-recall
//!
//! Answers a recall query with a hybrid score blending semantic
//! similarity, recency, confidence, access frequency, and a keyword
//! boost. Candidates are the union of the FTS top hits and the embedded
//! universe in scope; ranking is fully deterministic. When the embedder
//! is down the path degrades to FTS-only instead of failing.

mod candidates;
mod engine;
mod request;
mod scorer;

pub use candidates::Candidate;
pub use engine::RecallEngine;
pub use request::RecallRequest;
pub use scorer::score_candidate;
