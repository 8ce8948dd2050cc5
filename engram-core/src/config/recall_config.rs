use serde::{Deserialize, Serialize};

use crate::constants;

/// Weights for the hybrid score. Sum of the first four is 0.9; the FTS
/// boost rides on top, so scores live in [0, 1.1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallWeights {
    pub similarity: f64,
    pub recency: f64,
    pub confidence: f64,
    pub access: f64,
    pub fts_boost: f64,
}

impl Default for RecallWeights {
    fn default() -> Self {
        Self {
            similarity: 0.5,
            recency: 0.15,
            confidence: 0.20,
            access: 0.05,
            fts_boost: 0.1,
        }
    }
}

/// Recall subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// FTS hits gathered per query.
    pub fts_candidates: usize,
    /// Cap on the embedded-memory scan per query.
    pub scan_cap: usize,
    pub default_limit: usize,
    pub default_threshold: f64,
    pub weights: RecallWeights,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            fts_candidates: constants::FTS_CANDIDATE_LIMIT,
            scan_cap: constants::EMBEDDED_SCAN_CAP,
            default_limit: constants::DEFAULT_RECALL_LIMIT,
            default_threshold: constants::DEFAULT_RECALL_THRESHOLD,
            weights: RecallWeights::default(),
        }
    }
}
