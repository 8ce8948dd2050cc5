//! # engram-store
//!
//! Durable state for the memory service: an embedded SQLite database with
//! an FTS5 index kept in sync by triggers, forward-only migrations, a
//! single-writer/concurrent-reader connection pool, and prepared query
//! modules. Namespace isolation is enforced here, at the query layer.

pub mod codec;
pub mod engine;
pub mod lock;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StoreEngine;
pub use lock::InstanceLock;
pub use queries::contradiction_ops::ContradictionSort;
pub use queries::embedded_scan::EmbeddedRow;
pub use queries::maintenance::{DecayRow, EntityRow};
pub use queries::merge::MergePatch;

use engram_core::errors::EngramError;

/// Map any storage-layer failure into the closed taxonomy.
pub(crate) fn store_err(message: impl Into<String>) -> EngramError {
    EngramError::StoreUnavailable {
        message: message.into(),
    }
}
