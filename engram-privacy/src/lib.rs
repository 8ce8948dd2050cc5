//! # engram-privacy
//!
//! Secret scanning ahead of extraction and storage. The pattern set is a
//! closed, declarative table; each entry carries a build-time policy:
//! reject the ingest outright (high-certainty credentials) or mask the
//! match with a fixed sentinel and warn. Pattern names surface in errors;
//! matched values never do.

mod engine;
pub mod patterns;

pub use engine::{RedactionOutcome, Redactor};
pub use patterns::Policy;
