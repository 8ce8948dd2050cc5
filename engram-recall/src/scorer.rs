//! The hybrid score:
//!
//! ```text
//! score = 0.5·similarity + 0.15·recency + 0.20·confidence + 0.05·access
//!       + (0.1 if in_fts)
//! ```
//!
//! Factors are each in [0, 1]; the keyword boost rides on top, so scores
//! live in [0, 1.1].

use engram_core::config::RecallWeights;
use engram_core::constants::ACCESS_SATURATION;
use engram_core::models::ScoreBreakdown;
use engram_core::time::days_between;
use engram_core::traits::cosine;

use crate::candidates::Candidate;

/// Score one candidate against the optional query vector.
pub fn score_candidate(
    candidate: &Candidate,
    query_vec: Option<&[f32]>,
    weights: &RecallWeights,
    now_ms: i64,
) -> (f64, ScoreBreakdown) {
    let similarity = match (query_vec, candidate.embedding.as_deref()) {
        (Some(q), Some(e)) => cosine(q, e).max(0.0),
        _ => 0.0,
    };

    let anchor = candidate.last_accessed.unwrap_or(candidate.created_at);
    let recency = 1.0 / (1.0 + days_between(anchor, now_ms) * candidate.decay_rate);

    let access = ((1.0 + candidate.access_count as f64).ln()
        / (1.0 + ACCESS_SATURATION as f64).ln())
    .min(1.0);

    let fts_boost = if candidate.in_fts { weights.fts_boost } else { 0.0 };

    let breakdown = ScoreBreakdown {
        similarity,
        recency,
        confidence: candidate.confidence,
        access,
        fts_boost,
    };

    let score = weights.similarity * similarity
        + weights.recency * recency
        + weights.confidence * candidate.confidence
        + weights.access * access
        + fts_boost;

    (score, breakdown)
}
