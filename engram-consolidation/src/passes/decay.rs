//! Confidence decay: `confidence × (1 − decay_rate · days_since_touch)`,
//! clamped to [0, 1]. Rows whose value doesn't move are left untouched so
//! their `updated_at` anchor is preserved.

use engram_core::config::ConsolidationConfig;
use engram_core::errors::EngramResult;
use engram_core::time::{days_between, now_ms};
use engram_core::traits::Cancellable;
use engram_store::StoreEngine;

const CHANGE_EPSILON: f64 = 1e-9;

/// Run the pass. Returns the number of memories whose confidence moved.
pub fn run(
    store: &StoreEngine,
    config: &ConsolidationConfig,
    cancel: &dyn Cancellable,
) -> EngramResult<usize> {
    let now = now_ms();
    let rows = store.decay_candidates()?;

    let mut updates: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let touch = match row.last_accessed {
            Some(a) => a.max(row.updated_at),
            None => row.updated_at,
        };
        let days = days_between(touch, now);
        let decayed = (row.confidence * (1.0 - row.decay_rate * days)).clamp(0.0, 1.0);
        if (decayed - row.confidence).abs() > CHANGE_EPSILON {
            updates.push((row.id, decayed));
        }
    }

    let mut written = 0;
    for chunk in updates.chunks(config.merge_batch_size) {
        if cancel.is_cancelled() {
            break;
        }
        store.apply_confidence_updates(chunk, now)?;
        written += chunk.len();
    }

    Ok(written)
}
