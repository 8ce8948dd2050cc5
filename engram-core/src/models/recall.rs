use serde::{Deserialize, Serialize};

use crate::memory::Memory;

/// Per-factor contributions behind a recall hit's score, pre-weighting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub recency: f64,
    pub confidence: f64,
    pub access: f64,
    pub fts_boost: f64,
}

/// One ranked recall result: the full memory plus its score and breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallHit {
    #[serde(flatten)]
    pub memory: Memory,
    pub score: f64,
    #[serde(rename = "scoreBreakdown")]
    pub score_breakdown: ScoreBreakdown,
}
