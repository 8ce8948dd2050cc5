use serde::{Deserialize, Serialize};

use crate::constants;

/// Consolidation subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Cosine at or above which memories in a namespace are duplicates.
    pub duplicate_threshold: f64,
    /// Cosine at or above which same-entity memories are checked for
    /// contradiction.
    pub contradiction_threshold: f64,
    /// Rows mutated per writer acquisition.
    pub merge_batch_size: usize,
    /// Stale cleanup bounds.
    pub stale_confidence: f64,
    pub stale_age_days: f64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: constants::DUPLICATE_THRESHOLD,
            contradiction_threshold: constants::CONTRADICTION_THRESHOLD,
            merge_batch_size: constants::MERGE_BATCH_SIZE,
            stale_confidence: constants::STALE_CONFIDENCE,
            stale_age_days: constants::STALE_AGE_DAYS,
        }
    }
}
