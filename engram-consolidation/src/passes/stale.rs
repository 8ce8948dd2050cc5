//! Stale cleanup: low-confidence, old, never-recalled rows. Runs only
//! when explicitly flagged.

use engram_core::config::ConsolidationConfig;
use engram_core::errors::EngramResult;
use engram_core::time::now_ms;
use engram_core::traits::Cancellable;
use engram_store::StoreEngine;

/// Run the pass. Returns the number of rows deleted.
pub fn run(
    store: &StoreEngine,
    config: &ConsolidationConfig,
    cancel: &dyn Cancellable,
) -> EngramResult<usize> {
    let ids =
        store.stale_candidate_ids(config.stale_confidence, config.stale_age_days, now_ms())?;

    let mut deleted = 0;
    for chunk in ids.chunks(config.merge_batch_size) {
        if cancel.is_cancelled() {
            break;
        }
        deleted += store.bulk_delete(chunk)?;
    }
    Ok(deleted)
}
