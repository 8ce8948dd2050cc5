//! RecallEngine: embed → gather → score → filter → rank → truncate → bump.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use engram_core::config::RecallConfig;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{RecallHit, ScoreBreakdown};
use engram_core::time::now_ms;
use engram_core::traits::{Cancellable, Embedder};
use engram_store::StoreEngine;

use crate::candidates;
use crate::request::RecallRequest;
use crate::scorer::score_candidate;

pub struct RecallEngine {
    store: Arc<StoreEngine>,
    embedder: Arc<dyn Embedder>,
    config: RecallConfig,
}

/// Ranked candidate before the full rows are loaded.
struct Ranked {
    id: String,
    score: f64,
    breakdown: ScoreBreakdown,
    last_accessed: Option<i64>,
    created_at: i64,
}

impl RecallEngine {
    pub fn new(store: Arc<StoreEngine>, embedder: Arc<dyn Embedder>, config: RecallConfig) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Answer one query. Never errors on an empty result; embedder failure
    /// degrades to FTS-only. A cancelled recall performs no access bump.
    pub fn recall(
        &self,
        request: &RecallRequest,
        cancel: &dyn Cancellable,
    ) -> EngramResult<Vec<RecallHit>> {
        let (limit, threshold) = request.resolve()?;
        let namespace = request.namespace.as_deref();

        // Step 1: query embedding, or degraded mode.
        let query_vec = if self.embedder.is_available() {
            match self.embedder.embed(&request.query) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("query embedding failed; recall degrades to keyword-only");
                    None
                }
            }
        } else {
            None
        };
        let degraded = query_vec.is_none();

        if cancel.is_cancelled() {
            return Err(EngramError::Canceled);
        }

        // Step 2: candidate gathering.
        let gathered = candidates::gather(
            &self.store,
            &request.query,
            namespace,
            request.category,
            self.config.fts_candidates,
            self.config.scan_cap,
            degraded,
        )?;

        if cancel.is_cancelled() {
            return Err(EngramError::Canceled);
        }

        // Steps 3–4: score, then threshold on similarity (skipped when
        // degraded; keyword hits are all we have).
        let now = now_ms();
        let mut ranked: Vec<Ranked> = gathered
            .iter()
            .map(|c| {
                let (score, breakdown) =
                    score_candidate(c, query_vec.as_deref(), &self.config.weights, now);
                Ranked {
                    id: c.id.clone(),
                    score,
                    breakdown,
                    last_accessed: c.last_accessed,
                    created_at: c.created_at,
                }
            })
            .filter(|r| degraded || r.breakdown.similarity >= threshold)
            .collect();

        // Step 5: deterministic order.
        ranked.sort_by(compare_ranked);

        // Step 6: page.
        ranked.truncate(limit);

        if cancel.is_cancelled() {
            return Err(EngramError::Canceled);
        }

        // Load the full rows for the page.
        let ids: Vec<String> = ranked.iter().map(|r| r.id.clone()).collect();
        let mut by_id: HashMap<String, engram_core::memory::Memory> = self
            .store
            .get_bulk(&ids)?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let hits: Vec<RecallHit> = ranked
            .into_iter()
            .filter_map(|r| {
                by_id.remove(&r.id).map(|memory| RecallHit {
                    memory,
                    score: r.score,
                    score_breakdown: r.breakdown,
                })
            })
            .collect();

        // Step 7: fire-and-forget access bump. Callers see the pre-update
        // rows; a failed bump is logged, never surfaced.
        if !hits.is_empty() && !cancel.is_cancelled() {
            let ids: Vec<String> = hits.iter().map(|h| h.memory.id.clone()).collect();
            if let Err(e) = self.store.bump_access(&ids, now) {
                tracing::warn!(error = %e, "access bump failed after recall");
            }
        }

        tracing::debug!(
            results = hits.len(),
            degraded,
            "recall complete"
        );
        Ok(hits)
    }
}

/// Score desc, then last_accessed desc (unset sorts last), created_at
/// desc, id asc. Stable and total, so identical inputs rank identically.
fn compare_ranked(a: &Ranked, b: &Ranked) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.last_accessed.cmp(&a.last_accessed))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
