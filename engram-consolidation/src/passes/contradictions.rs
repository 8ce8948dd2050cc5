//! Contradiction detection: topically close same-entity pairs whose
//! contents differ in negation polarity, or preference/decision pairs
//! with heavy overlap but diverging wording.

use uuid::Uuid;

use engram_core::config::ConsolidationConfig;
use engram_core::errors::EngramResult;
use engram_core::memory::Category;
use engram_core::models::{Contradiction, ContradictionStatus};
use engram_core::time::now_ms;
use engram_core::traits::{cosine, Cancellable};
use engram_store::{EntityRow, StoreEngine};

use crate::negation::{has_negation, jaccard, token_set};

/// Overlap above which same-stance preference/decision pairs count as
/// conflicting when their wording diverges.
const OVERLAP_THRESHOLD: f64 = 0.6;

/// Run the pass. Returns the number of new unresolved contradictions.
pub fn run(
    store: &StoreEngine,
    config: &ConsolidationConfig,
    cancel: &dyn Cancellable,
) -> EngramResult<usize> {
    let rows = store.embedded_with_entity()?;
    let mut detected = 0;

    // Rows arrive ordered by (entity, created_at, id); group in one pass.
    // Grouping also keys on namespace so scopes never cross.
    let mut start = 0;
    while start < rows.len() {
        if cancel.is_cancelled() {
            break;
        }
        let mut end = start + 1;
        while end < rows.len()
            && rows[end].entity == rows[start].entity
            && rows[end].namespace == rows[start].namespace
        {
            end += 1;
        }
        detected += check_group(store, &rows[start..end], config)?;
        start = end;
    }

    Ok(detected)
}

fn check_group(
    store: &StoreEngine,
    group: &[EntityRow],
    config: &ConsolidationConfig,
) -> EngramResult<usize> {
    let mut detected = 0;

    for i in 0..group.len() {
        for j in (i + 1)..group.len() {
            let (a, b) = (&group[i], &group[j]);

            let cos = cosine(&a.embedding, &b.embedding);
            if cos < config.contradiction_threshold {
                continue;
            }
            let Some(reason) = conflict_reason(a, b) else {
                continue;
            };
            if store.unresolved_pair_exists(&a.id, &b.id)? {
                continue;
            }

            let confidence = cos.min(1.0 - (a.confidence - b.confidence).abs() / 2.0);
            let contradiction = Contradiction {
                id: Uuid::new_v4().to_string(),
                memory1_id: a.id.clone(),
                memory2_id: b.id.clone(),
                entity: a.entity.clone(),
                confidence,
                reason: reason.to_string(),
                status: ContradictionStatus::Unresolved,
                resolution_action: None,
                detected_at: now_ms(),
                resolved_at: None,
            };
            store.put_contradiction(&contradiction)?;
            detected += 1;
            tracing::info!(
                entity = %a.entity,
                memory1 = %a.id,
                memory2 = %b.id,
                reason,
                "contradiction detected"
            );
        }
    }

    Ok(detected)
}

/// Which trigger fired, if any. Pair order is ingest order.
fn conflict_reason(a: &EntityRow, b: &EntityRow) -> Option<&'static str> {
    let neg_a = has_negation(&a.content);
    let neg_b = has_negation(&b.content);

    if neg_a != neg_b {
        return Some("negation polarity differs");
    }

    let opinionated = |c: Category| matches!(c, Category::Preference | Category::Decision);
    if opinionated(a.category) && opinionated(b.category) {
        let (ta, tb) = (token_set(&a.content), token_set(&b.content));
        let overlap = jaccard(&ta, &tb);
        let diverges = ta.difference(&tb).next().is_some() && tb.difference(&ta).next().is_some();
        if overlap >= OVERLAP_THRESHOLD && overlap < 1.0 && diverges {
            return Some("opposing preference or decision wording");
        }
    }

    None
}
