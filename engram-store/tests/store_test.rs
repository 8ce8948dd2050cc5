use engram_core::memory::{Category, Confidence, Memory, Source};
use engram_core::models::{Contradiction, ContradictionStatus, ResolutionAction};
use engram_store::{ContradictionSort, MergePatch, StoreEngine};

const DIM: usize = 8;

fn unit_vec(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    v[seed % DIM] = 1.0;
    v
}

fn make_memory(id: &str, content: &str, namespace: &str) -> Memory {
    Memory {
        id: id.to_string(),
        content: content.to_string(),
        entity: None,
        category: Category::Fact,
        confidence: Confidence::new(0.8),
        embedding: Some(unit_vec(id.len())),
        source: Source::Manual,
        namespace: namespace.to_string(),
        tags: vec![],
        access_count: 0,
        decay_rate: 0.01,
        created_at: 1_000,
        updated_at: 1_000,
        last_accessed: None,
    }
}

fn open_store() -> StoreEngine {
    StoreEngine::open_in_memory(DIM, "test-model").unwrap()
}

#[test]
fn put_then_get_round_trips() {
    let store = open_store();
    let m = make_memory("m1", "Use PostgreSQL in production", "default");
    store.put(&m).unwrap();

    let loaded = store.get("m1").unwrap().unwrap();
    assert_eq!(loaded.content, m.content);
    assert_eq!(loaded.embedding, m.embedding);
    assert_eq!(loaded.namespace, "default");
    assert_eq!(loaded.access_count, 0);
}

#[test]
fn duplicate_id_is_rejected() {
    let store = open_store();
    let m = make_memory("m1", "first", "default");
    store.put(&m).unwrap();

    let err = store.put(&make_memory("m1", "second", "default")).unwrap_err();
    assert_eq!(err.kind(), "DuplicateId");
}

#[test]
fn list_orders_by_created_desc_then_id_asc() {
    let store = open_store();
    for (id, created) in [("b", 2_000), ("a", 2_000), ("c", 1_000)] {
        let mut m = make_memory(id, "row", "default");
        m.created_at = created;
        m.updated_at = created;
        store.put(&m).unwrap();
    }

    let (rows, total) = store.list(Some("default"), None, 10, 0).unwrap();
    assert_eq!(total, 3);
    let ids: Vec<&str> = rows.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn list_never_crosses_namespaces() {
    let store = open_store();
    store.put(&make_memory("m1", "alpha", "ns-a")).unwrap();
    store.put(&make_memory("m2", "beta", "ns-b")).unwrap();

    let (rows, total) = store.list(Some("ns-a"), None, 10, 0).unwrap();
    assert_eq!(total, 1);
    assert!(rows.iter().all(|m| m.namespace == "ns-a"));

    // Namespaces are case-sensitive opaque strings.
    let (rows, _) = store.list(Some("NS-A"), None, 10, 0).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn fts_finds_inserted_content_and_respects_namespace() {
    let store = open_store();
    store
        .put(&make_memory("m1", "I prefer dark mode in my editor", "default"))
        .unwrap();
    store
        .put(&make_memory("m2", "dark chocolate is great", "other"))
        .unwrap();

    let hits = store.fts_query("dark mode", Some("default"), None, 20).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "m1");
}

#[test]
fn fts_row_disappears_after_delete() {
    let store = open_store();
    store
        .put(&make_memory("m1", "ephemeral keyword zanzibar", "default"))
        .unwrap();
    assert_eq!(store.fts_query("zanzibar", None, None, 20).unwrap().len(), 1);

    assert!(store.delete_by_id("m1").unwrap());
    assert!(store.fts_query("zanzibar", None, None, 20).unwrap().is_empty());
    assert!(store.get("m1").unwrap().is_none());
}

#[test]
fn fts_tracks_updates_through_merge() {
    let store = open_store();
    store.put(&make_memory("w", "use tabs for indentation", "default")).unwrap();
    store.put(&make_memory("l", "use tabs for indentation", "default")).unwrap();

    store
        .apply_merge(
            "w",
            &["l".to_string()],
            &MergePatch {
                access_count: 7,
                tags: vec!["style".into()],
                confidence: 0.9,
                updated_at: 5_000,
            },
        )
        .unwrap();

    let hits = store.fts_query("indentation", None, None, 20).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "w");

    let winner = store.get("w").unwrap().unwrap();
    assert_eq!(winner.access_count, 7);
    assert_eq!(winner.tags, vec!["style"]);
    assert!((winner.confidence.value() - 0.9).abs() < 1e-9);
    assert_eq!(winner.updated_at, 5_000);
    assert!(store.get("l").unwrap().is_none());
}

#[test]
fn bump_access_updates_stats_atomically() {
    let store = open_store();
    store.put(&make_memory("m1", "bump me", "default")).unwrap();
    store.put(&make_memory("m2", "bump me too", "default")).unwrap();

    store
        .bump_access(&["m1".to_string(), "m2".to_string()], 9_000)
        .unwrap();
    store.bump_access(&["m1".to_string()], 9_500).unwrap();

    let m1 = store.get("m1").unwrap().unwrap();
    assert_eq!(m1.access_count, 2);
    assert_eq!(m1.last_accessed, Some(9_500));
    let m2 = store.get("m2").unwrap().unwrap();
    assert_eq!(m2.access_count, 1);
}

#[test]
fn mismatched_blob_reads_as_absent() {
    // Reopening with a different advertised dimension clears vectors.
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("memory.db");

    {
        let store = StoreEngine::open(&db, DIM, "test-model").unwrap();
        store.put(&make_memory("m1", "dimensional drift", "default")).unwrap();
        assert!(store.get("m1").unwrap().unwrap().embedding.is_some());
    }
    {
        let store = StoreEngine::open(&db, DIM * 2, "test-model").unwrap();
        let m = store.get("m1").unwrap().unwrap();
        assert!(m.embedding.is_none());
        assert_eq!(store.count_embedded(None).unwrap(), 0);
    }
}

#[test]
fn iterate_embedded_is_ordered_and_capped() {
    let store = open_store();
    for id in ["c", "a", "b", "d"] {
        store.put(&make_memory(id, "embedded row", "default")).unwrap();
    }
    let mut no_vec = make_memory("z", "no vector", "default");
    no_vec.embedding = None;
    store.put(&no_vec).unwrap();

    let rows = store.iterate_embedded(Some("default"), None, 3).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

fn make_contradiction(id: &str, m1: &str, m2: &str) -> Contradiction {
    Contradiction {
        id: id.to_string(),
        memory1_id: m1.to_string(),
        memory2_id: m2.to_string(),
        entity: "tabs".to_string(),
        confidence: 0.8,
        reason: "negation polarity differs".to_string(),
        status: ContradictionStatus::Unresolved,
        resolution_action: None,
        detected_at: 1_000,
        resolved_at: None,
    }
}

#[test]
fn deleting_a_memory_cascades_unresolved_contradictions() {
    let store = open_store();
    store.put(&make_memory("m1", "always tabs", "default")).unwrap();
    store.put(&make_memory("m2", "never tabs", "default")).unwrap();
    store.put_contradiction(&make_contradiction("c1", "m1", "m2")).unwrap();

    assert!(store.unresolved_pair_exists("m2", "m1").unwrap());
    store.delete_by_id("m2").unwrap();

    let (rows, unresolved) = store
        .list_contradictions(None, None, ContradictionSort::DetectedDesc)
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(unresolved, 0);
}

#[test]
fn resolve_keep_first_deletes_loser_and_keeps_record() {
    let store = open_store();
    store.put(&make_memory("m1", "always tabs", "default")).unwrap();
    store.put(&make_memory("m2", "never tabs", "default")).unwrap();
    store.put_contradiction(&make_contradiction("c1", "m1", "m2")).unwrap();

    let resolved = store
        .resolve_contradiction("c1", ResolutionAction::KeepFirst, 7_000)
        .unwrap();
    assert_eq!(resolved.status, ContradictionStatus::Resolved);
    assert_eq!(resolved.resolution_action, Some(ResolutionAction::KeepFirst));
    assert_eq!(resolved.resolved_at, Some(7_000));

    assert!(store.get("m1").unwrap().is_some());
    assert!(store.get("m2").unwrap().is_none());

    let row = store.get_contradiction("c1").unwrap().unwrap();
    assert_eq!(row.status, ContradictionStatus::Resolved);
}

#[test]
fn resolve_is_idempotent_when_loser_already_gone() {
    let store = open_store();
    store.put(&make_memory("m1", "always tabs", "default")).unwrap();
    store.put(&make_memory("m2", "never tabs", "default")).unwrap();
    store.put_contradiction(&make_contradiction("c1", "m1", "m2")).unwrap();

    store.resolve_contradiction("c1", ResolutionAction::KeepFirst, 7_000).unwrap();
    // Second resolve: the loser is already gone; still succeeds.
    let again = store
        .resolve_contradiction("c1", ResolutionAction::KeepFirst, 8_000)
        .unwrap();
    assert_eq!(again.status, ContradictionStatus::Resolved);
}

#[test]
fn dismiss_keeps_both_memories() {
    let store = open_store();
    store.put(&make_memory("m1", "always tabs", "default")).unwrap();
    store.put(&make_memory("m2", "never tabs", "default")).unwrap();
    store.put_contradiction(&make_contradiction("c1", "m1", "m2")).unwrap();

    let resolved = store
        .resolve_contradiction("c1", ResolutionAction::Dismiss, 7_000)
        .unwrap();
    assert_eq!(resolved.status, ContradictionStatus::Dismissed);
    assert!(store.get("m1").unwrap().is_some());
    assert!(store.get("m2").unwrap().is_some());
}

#[test]
fn schema_mismatch_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("memory.db");
    {
        let _store = StoreEngine::open(&db, DIM, "test-model").unwrap();
    }
    {
        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute(
            "UPDATE meta SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();
    }
    let err = StoreEngine::open(&db, DIM, "test-model").unwrap_err();
    assert_eq!(err.kind(), "SchemaMismatch");
}

#[test]
fn stats_count_by_category_and_namespace() {
    let store = open_store();
    let mut pref = make_memory("m1", "prefers vim", "default");
    pref.category = Category::Preference;
    store.put(&pref).unwrap();
    store.put(&make_memory("m2", "plain fact", "default")).unwrap();
    let mut other = make_memory("m3", "other scope", "work");
    other.embedding = None;
    store.put(&other).unwrap();

    let stats = store.memory_stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.with_embeddings, 2);
    assert_eq!(stats.by_category.get("preference"), Some(&1));
    assert_eq!(stats.by_category.get("fact"), Some(&2));
    assert_eq!(stats.by_namespace.get("work"), Some(&1));
}
