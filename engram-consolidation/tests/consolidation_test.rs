use std::sync::Arc;

use engram_consolidation::ConsolidationEngine;
use engram_core::config::ConsolidationConfig;
use engram_core::memory::{Category, Confidence};
use engram_core::models::{ConsolidationOptions, ContradictionStatus};
use engram_core::time::MS_PER_DAY;
use engram_core::traits::CancellationToken;
use engram_store::{ContradictionSort, StoreEngine};
use test_fixtures::{embedded_memory, memory, now_ms, StubEmbedder};

const DIM: usize = 64;

fn setup() -> (Arc<StoreEngine>, Arc<StubEmbedder>, ConsolidationEngine) {
    let store = Arc::new(StoreEngine::open_in_memory(DIM, "stub-one-hot").unwrap());
    let embedder = Arc::new(StubEmbedder::new(DIM));
    let engine = ConsolidationEngine::new(store.clone(), ConsolidationConfig::default());
    (store, embedder, engine)
}

fn dedupe_only() -> ConsolidationOptions {
    ConsolidationOptions {
        detect_duplicates: true,
        ..Default::default()
    }
}

fn contradictions_only() -> ConsolidationOptions {
    ConsolidationOptions {
        detect_contradictions: true,
        ..Default::default()
    }
}

#[test]
fn identical_contents_merge_to_one_row() {
    let (store, embedder, engine) = setup();
    let mut first = embedded_memory("m1", "Use PostgreSQL in production", "default", &embedder);
    first.access_count = 3;
    first.tags = vec!["infra".into()];
    store.put(&first).unwrap();

    let mut second = embedded_memory("m2", "Use PostgreSQL in production", "default", &embedder);
    second.access_count = 2;
    second.tags = vec!["database".into(), "infra".into()];
    store.put(&second).unwrap();

    let report = engine
        .consolidate(dedupe_only(), &CancellationToken::new())
        .unwrap();
    assert_eq!(report.duplicates_removed, 1);

    let (rows, total) = store.list(Some("default"), None, 10, 0).unwrap();
    assert_eq!(total, 1);
    let survivor = &rows[0];
    assert_eq!(survivor.access_count, 5);
    assert_eq!(survivor.tags, vec!["infra", "database"]);
}

#[test]
fn merge_never_crosses_namespaces() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "Use PostgreSQL in production", "a", &embedder))
        .unwrap();
    store
        .put(&embedded_memory("m2", "Use PostgreSQL in production", "b", &embedder))
        .unwrap();

    let report = engine
        .consolidate(dedupe_only(), &CancellationToken::new())
        .unwrap();
    assert_eq!(report.duplicates_removed, 0);

    let (_, total) = store.list(None, None, 10, 0).unwrap();
    assert_eq!(total, 2);
}

#[test]
fn dissimilar_contents_do_not_merge() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "Use PostgreSQL in production", "default", &embedder))
        .unwrap();
    store
        .put(&embedded_memory("m2", "deploy dashboards on fridays", "default", &embedder))
        .unwrap();

    let report = engine
        .consolidate(dedupe_only(), &CancellationToken::new())
        .unwrap();
    assert_eq!(report.duplicates_removed, 0);
}

#[test]
fn winner_has_highest_confidence() {
    let (store, embedder, engine) = setup();
    let mut weak = embedded_memory("m-weak", "Use PostgreSQL in production", "default", &embedder);
    weak.confidence = Confidence::new(0.6);
    store.put(&weak).unwrap();
    let mut strong =
        embedded_memory("m-strong", "Use PostgreSQL in production", "default", &embedder);
    strong.confidence = Confidence::new(0.9);
    store.put(&strong).unwrap();

    engine
        .consolidate(dedupe_only(), &CancellationToken::new())
        .unwrap();

    assert!(store.get("m-strong").unwrap().is_some());
    assert!(store.get("m-weak").unwrap().is_none());
}

fn tabs_pair(store: &StoreEngine, embedder: &StubEmbedder) {
    let mut yes = embedded_memory(
        "m-yes",
        "I always use tabs for indentation",
        "default",
        embedder,
    );
    yes.entity = Some("tabs".into());
    yes.category = Category::Preference;
    store.put(&yes).unwrap();

    let mut no = embedded_memory(
        "m-no",
        "I never use tabs for indentation",
        "default",
        embedder,
    );
    no.entity = Some("tabs".into());
    no.category = Category::Preference;
    no.created_at += 1;
    no.updated_at += 1;
    store.put(&no).unwrap();
}

#[test]
fn opposing_polarity_same_entity_is_detected() {
    let (store, embedder, engine) = setup();
    tabs_pair(&store, &embedder);

    let report = engine
        .consolidate(contradictions_only(), &CancellationToken::new())
        .unwrap();
    assert!(report.contradictions_detected >= 1);

    let (rows, unresolved) = store
        .list_contradictions(None, None, ContradictionSort::DetectedDesc)
        .unwrap();
    assert_eq!(unresolved, rows.len() as u64);
    let c = &rows[0];
    assert_eq!(c.status, ContradictionStatus::Unresolved);
    assert_eq!(c.entity, "tabs");
    assert!(c.confidence > 0.0 && c.confidence <= 1.0);
    // Pair order follows ingest order.
    assert_eq!(c.memory1_id, "m-yes");
    assert_eq!(c.memory2_id, "m-no");
}

#[test]
fn detection_does_not_duplicate_unresolved_pairs() {
    let (store, embedder, engine) = setup();
    tabs_pair(&store, &embedder);

    let first = engine
        .consolidate(contradictions_only(), &CancellationToken::new())
        .unwrap();
    let second = engine
        .consolidate(contradictions_only(), &CancellationToken::new())
        .unwrap();

    assert!(first.contradictions_detected >= 1);
    assert_eq!(second.contradictions_detected, 0);
}

#[test]
fn different_entities_never_conflict() {
    let (store, embedder, engine) = setup();
    let mut a = embedded_memory("m1", "I always use tabs here", "default", &embedder);
    a.entity = Some("tabs".into());
    store.put(&a).unwrap();
    let mut b = embedded_memory("m2", "I never use tabs here", "default", &embedder);
    b.entity = Some("spaces".into());
    store.put(&b).unwrap();

    let report = engine
        .consolidate(contradictions_only(), &CancellationToken::new())
        .unwrap();
    assert_eq!(report.contradictions_detected, 0);
}

#[test]
fn decay_matches_the_boundary_law() {
    let (store, _, engine) = setup();
    // confidence 0.8, decay_rate 0.01, untouched for 10 days → 0.72.
    let mut m = memory("m1", "decaying row", "default");
    m.confidence = Confidence::new(0.8);
    m.decay_rate = 0.01;
    let ten_days_ago = now_ms() - (10.0 * MS_PER_DAY) as i64;
    m.created_at = ten_days_ago;
    m.updated_at = ten_days_ago;
    store.put(&m).unwrap();

    let report = engine
        .consolidate(
            ConsolidationOptions {
                apply_decay: true,
                ..Default::default()
            },
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.memories_decayed, 1);

    let after = store.get("m1").unwrap().unwrap();
    assert!(
        (after.confidence.value() - 0.72).abs() < 1e-5,
        "got {}",
        after.confidence.value()
    );
    assert!(after.updated_at > ten_days_ago);
}

#[test]
fn decay_clamps_at_zero() {
    let (store, _, engine) = setup();
    let mut m = memory("m1", "ancient row", "default");
    m.confidence = Confidence::new(0.5);
    m.decay_rate = 0.1;
    let long_ago = now_ms() - (400.0 * MS_PER_DAY) as i64;
    m.created_at = long_ago;
    m.updated_at = long_ago;
    store.put(&m).unwrap();

    engine
        .consolidate(
            ConsolidationOptions {
                apply_decay: true,
                ..Default::default()
            },
            &CancellationToken::new(),
        )
        .unwrap();

    assert_eq!(store.get("m1").unwrap().unwrap().confidence.value(), 0.0);
}

#[test]
fn stale_cleanup_requires_its_flag() {
    let (store, _, engine) = setup();
    let mut m = memory("m1", "forgotten row", "default");
    m.confidence = Confidence::new(0.05);
    let old = now_ms() - (120.0 * MS_PER_DAY) as i64;
    m.created_at = old;
    m.updated_at = old;
    store.put(&m).unwrap();

    // All other passes on, cleanup off: the row survives.
    let report = engine
        .consolidate(
            ConsolidationOptions {
                detect_duplicates: true,
                detect_contradictions: true,
                apply_decay: true,
                cleanup_stale: false,
            },
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.stale_deleted, 0);
    assert!(store.get("m1").unwrap().is_some());

    let report = engine
        .consolidate(
            ConsolidationOptions {
                cleanup_stale: true,
                ..Default::default()
            },
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.stale_deleted, 1);
    assert!(store.get("m1").unwrap().is_none());
}

#[test]
fn stale_cleanup_spares_accessed_rows() {
    let (store, _, engine) = setup();
    let mut m = memory("m1", "old but loved", "default");
    m.confidence = Confidence::new(0.05);
    let old = now_ms() - (120.0 * MS_PER_DAY) as i64;
    m.created_at = old;
    m.updated_at = old;
    m.access_count = 4;
    m.last_accessed = Some(now_ms());
    store.put(&m).unwrap();

    let report = engine
        .consolidate(
            ConsolidationOptions {
                cleanup_stale: true,
                ..Default::default()
            },
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.stale_deleted, 0);
}

#[test]
fn dedupe_and_detection_are_idempotent_on_a_quiescent_store() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "Use PostgreSQL in production", "default", &embedder))
        .unwrap();
    store
        .put(&embedded_memory("m2", "Use PostgreSQL in production", "default", &embedder))
        .unwrap();
    tabs_pair(&store, &embedder);

    let options = ConsolidationOptions {
        detect_duplicates: true,
        detect_contradictions: true,
        apply_decay: false,
        cleanup_stale: false,
    };

    let first = engine.consolidate(options, &CancellationToken::new()).unwrap();
    assert!(first.duplicates_removed >= 1);

    let second = engine.consolidate(options, &CancellationToken::new()).unwrap();
    assert_eq!(second.duplicates_removed, 0);
    assert_eq!(second.contradictions_detected, 0);
}
