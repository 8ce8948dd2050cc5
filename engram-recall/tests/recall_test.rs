use std::sync::Arc;

use engram_core::config::RecallConfig;
use engram_core::memory::Category;
use engram_core::traits::{Cancellable, CancellationToken, Embedder};
use engram_recall::{RecallEngine, RecallRequest};
use engram_store::StoreEngine;
use test_fixtures::{embedded_memory, memory, StubEmbedder};

const DIM: usize = 64;

fn setup() -> (Arc<StoreEngine>, Arc<StubEmbedder>, RecallEngine) {
    let store = Arc::new(StoreEngine::open_in_memory(DIM, "stub-one-hot").unwrap());
    let embedder = Arc::new(StubEmbedder::new(DIM));
    let engine = RecallEngine::new(store.clone(), embedder.clone(), RecallConfig::default());
    (store, embedder, engine)
}

#[test]
fn fresh_preference_is_top_hit() {
    let (store, embedder, engine) = setup();
    let mut m = embedded_memory("m1", "I prefer dark mode", "default", &embedder);
    m.category = Category::Preference;
    store.put(&m).unwrap();
    store
        .put(&embedded_memory("m2", "deploy runs at midnight", "default", &embedder))
        .unwrap();

    let hits = engine
        .recall(
            &RecallRequest::new("what theme do I like, dark mode?"),
            &CancellationToken::new(),
        )
        .unwrap();

    assert!(!hits.is_empty());
    assert_eq!(hits[0].memory.id, "m1");
    assert!(hits[0].score > 0.5, "score was {}", hits[0].score);
    assert!(hits[0].score_breakdown.similarity > 0.3);
}

#[test]
fn namespace_filter_is_never_crossed() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "dark mode in work profile", "work", &embedder))
        .unwrap();
    store
        .put(&embedded_memory("m2", "dark mode at home", "home", &embedder))
        .unwrap();

    let mut req = RecallRequest::new("dark mode");
    req.namespace = Some("work".into());
    req.threshold = Some(0.0);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();

    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.memory.namespace == "work"));
}

#[test]
fn category_filter_applies() {
    let (store, embedder, engine) = setup();
    let mut pref = embedded_memory("m1", "tabs beat spaces", "default", &embedder);
    pref.category = Category::Preference;
    store.put(&pref).unwrap();
    let mut fact = embedded_memory("m2", "tabs are one byte", "default", &embedder);
    fact.category = Category::Fact;
    store.put(&fact).unwrap();

    let mut req = RecallRequest::new("tabs");
    req.category = Some(Category::Preference);
    req.threshold = Some(0.0);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();

    assert!(hits.iter().all(|h| h.memory.category == Category::Preference));
}

#[test]
fn threshold_drops_dissimilar_candidates() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "kubernetes cluster autoscaling", "default", &embedder))
        .unwrap();

    let mut req = RecallRequest::new("favorite pizza toppings");
    req.threshold = Some(0.9);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn empty_store_returns_empty_not_error() {
    let (_, _, engine) = setup();
    let hits = engine
        .recall(&RecallRequest::new("anything"), &CancellationToken::new())
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn identical_stats_tie_break_on_id_ascending() {
    // Three rows with byte-identical content and pinned equal timestamps:
    // scores tie exactly, so ordering falls through to id ascending.
    let build = || {
        let (store, embedder, engine) = setup();
        for id in ["b", "c", "a"] {
            let mut m = embedded_memory(id, "identical tie break row", "default", &embedder);
            m.created_at = 1_700_000_000_000;
            m.updated_at = 1_700_000_000_000;
            store.put(&m).unwrap();
        }
        (store, embedder, engine)
    };

    let mut req = RecallRequest::new("identical tie break row");
    req.threshold = Some(0.0);

    let (_s1, _e1, engine1) = build();
    let first: Vec<String> = engine1
        .recall(&req, &CancellationToken::new())
        .unwrap()
        .iter()
        .map(|h| h.memory.id.clone())
        .collect();
    assert_eq!(first, vec!["a", "b", "c"]);

    let (_s2, _e2, engine2) = build();
    let second: Vec<String> = engine2
        .recall(&req, &CancellationToken::new())
        .unwrap()
        .iter()
        .map(|h| h.memory.id.clone())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn successful_recall_bumps_access_stats() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "bump target row", "default", &embedder))
        .unwrap();

    let mut req = RecallRequest::new("bump target");
    req.threshold = Some(0.0);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();
    assert_eq!(hits.len(), 1);
    // The caller sees the pre-update row.
    assert_eq!(hits[0].memory.access_count, 0);

    let after = store.get("m1").unwrap().unwrap();
    assert_eq!(after.access_count, 1);
    assert!(after.last_accessed.is_some());
}

#[test]
fn cancelled_recall_never_bumps() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "cancel target row", "default", &embedder))
        .unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let err = engine
        .recall(&RecallRequest::new("cancel target"), &token)
        .unwrap_err();
    assert_eq!(err.kind(), "Canceled");

    let after = store.get("m1").unwrap().unwrap();
    assert_eq!(after.access_count, 0);
    assert!(after.last_accessed.is_none());
}

#[test]
fn degraded_mode_returns_keyword_hits_with_zero_similarity() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "the zanzibar feature flag", "default", &embedder))
        .unwrap();
    embedder.set_available(false);

    let hits = engine
        .recall(&RecallRequest::new("zanzibar"), &CancellationToken::new())
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].memory.id, "m1");
    assert_eq!(hits[0].score_breakdown.similarity, 0.0);
    assert!(hits[0].score_breakdown.fts_boost > 0.0);
}

#[test]
fn degraded_mode_ignores_threshold() {
    let (store, embedder, engine) = setup();
    store
        .put(&embedded_memory("m1", "threshold escape hatch", "default", &embedder))
        .unwrap();
    embedder.set_available(false);

    let mut req = RecallRequest::new("threshold escape");
    req.threshold = Some(0.99);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn vectorless_rows_are_reachable_through_fts() {
    let (store, embedder, engine) = setup();
    // Stored while the embedder was down: no vector at all.
    store.put(&memory("m1", "degraded xylophone entry", "default")).unwrap();
    assert!(embedder.is_available());

    let mut req = RecallRequest::new("xylophone");
    req.threshold = Some(0.0);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score_breakdown.similarity, 0.0);
    assert_eq!(hits[0].score_breakdown.fts_boost, 0.1);
}

#[test]
fn limit_truncates_after_ranking() {
    let (store, embedder, engine) = setup();
    for i in 0..10 {
        store
            .put(&embedded_memory(
                &format!("m{i}"),
                "repeated corpus row about caching",
                "default",
                &embedder,
            ))
            .unwrap();
    }

    let mut req = RecallRequest::new("caching");
    req.limit = Some(3);
    req.threshold = Some(0.0);
    let hits = engine.recall(&req, &CancellationToken::new()).unwrap();
    assert_eq!(hits.len(), 3);
}
