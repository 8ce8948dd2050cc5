//! # engram-ingest
//!
//! The single-write orchestration: validate → redact → extract → embed →
//! store. Redaction can reject the write; an unavailable embedder only
//! degrades it. Cancellation is honored up to the store put; after that
//! the operation runs to completion.

mod engine;
mod request;

pub use engine::{IngestEngine, IngestOutcome};
pub use request::IngestRequest;
