//! StoreEngine — owns the connection pool, runs migrations at open,
//! reconciles the persisted embedding dimension, and exposes the full
//! storage contract. All mutations route through the single writer; reads
//! use the pool (or the writer in in-memory mode, where pool connections
//! are isolated databases).

use std::path::Path;

use engram_core::errors::EngramResult;
use engram_core::memory::{Category, Memory};
use engram_core::models::{Contradiction, ContradictionStatus, MemoryStats, ResolutionAction};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;
use crate::queries::contradiction_ops::ContradictionSort;
use crate::queries::embedded_scan::EmbeddedRow;
use crate::queries::fts::FtsHit;
use crate::queries::maintenance::{DecayRow, EntityRow};
use crate::queries::merge::MergePatch;

#[derive(Debug)]
pub struct StoreEngine {
    pool: ConnectionPool,
    use_read_pool: bool,
    /// Embedding dimensionality recorded in the meta row.
    dim: usize,
}

impl StoreEngine {
    /// Open a store backed by a file on disk, migrate it, and reconcile the
    /// embedding dimension against what the current embedder advertises.
    pub fn open(path: &Path, dim: usize, model_name: &str) -> EngramResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let engine = Self {
            pool,
            use_read_pool: true,
            dim,
        };
        engine.initialize(model_name)?;
        Ok(engine)
    }

    /// Open an in-memory store (for testing). Reads route through the
    /// writer because in-memory pool connections can't see its data.
    pub fn open_in_memory(dim: usize, model_name: &str) -> EngramResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            use_read_pool: false,
            dim,
        };
        engine.initialize(model_name)?;
        Ok(engine)
    }

    fn initialize(&self, model_name: &str) -> EngramResult<()> {
        self.pool.writer.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            self.reconcile_embedding_meta(conn, model_name)
        })
    }

    /// Enforce the dimension invariant at startup: a store whose recorded
    /// dimension or model differs from the running embedder has its
    /// embeddings cleared rather than ever being read at the wrong shape.
    fn reconcile_embedding_meta(
        &self,
        conn: &rusqlite::Connection,
        model_name: &str,
    ) -> EngramResult<()> {
        let recorded_dim = migrations::read_meta(conn, "embedding_dim")?
            .and_then(|v| v.parse::<usize>().ok());
        let recorded_model = migrations::read_meta(conn, "embedding_model")?;

        let mismatch = match (recorded_dim, recorded_model.as_deref()) {
            (Some(d), Some(m)) => d != self.dim || m != model_name,
            (None, None) => false,
            _ => true,
        };

        if mismatch {
            let cleared = conn
                .execute("UPDATE memories SET embedding = NULL", [])
                .map_err(|e| crate::store_err(e.to_string()))?;
            tracing::warn!(
                cleared,
                old_dim = ?recorded_dim,
                new_dim = self.dim,
                "embedding dimension or model changed; cleared stored vectors"
            );
        }

        migrations::write_meta(conn, "embedding_dim", &self.dim.to_string())?;
        migrations::write_meta(conn, "embedding_model", model_name)?;
        Ok(())
    }

    /// The dimension every stored embedding must have.
    pub fn dimensions(&self) -> usize {
        self.dim
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> EngramResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    // ── Memory CRUD ──────────────────────────────────────────────────────

    /// Insert one row; `DuplicateId` if the id exists.
    pub fn put(&self, memory: &Memory) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::insert_memory(conn, memory))
    }

    pub fn get(&self, id: &str) -> EngramResult<Option<Memory>> {
        self.with_reader(|conn| queries::memory_crud::get_memory(conn, id, self.dim))
    }

    pub fn get_bulk(&self, ids: &[String]) -> EngramResult<Vec<Memory>> {
        self.with_reader(|conn| queries::memory_crud::get_bulk(conn, ids, self.dim))
    }

    /// Deterministic page: `created_at DESC, id ASC`, plus the total count.
    pub fn list(
        &self,
        namespace: Option<&str>,
        category: Option<Category>,
        limit: usize,
        offset: usize,
    ) -> EngramResult<(Vec<Memory>, u64)> {
        self.with_reader(|conn| {
            queries::memory_list::list_memories(conn, namespace, category, limit, offset, self.dim)
        })
    }

    pub fn delete_by_id(&self, id: &str) -> EngramResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::delete_memory(conn, id))
    }

    pub fn bulk_delete(&self, ids: &[String]) -> EngramResult<usize> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::bulk_delete(conn, ids))
    }

    // ── Search ───────────────────────────────────────────────────────────

    pub fn fts_query(
        &self,
        query: &str,
        namespace: Option<&str>,
        category: Option<Category>,
        limit: usize,
    ) -> EngramResult<Vec<FtsHit>> {
        self.with_reader(|conn| queries::fts::fts_query(conn, query, namespace, category, limit))
    }

    pub fn iterate_embedded(
        &self,
        namespace: Option<&str>,
        category: Option<Category>,
        cap: usize,
    ) -> EngramResult<Vec<EmbeddedRow>> {
        self.with_reader(|conn| {
            queries::embedded_scan::iterate_embedded(conn, namespace, category, cap, self.dim)
        })
    }

    pub fn count_embedded(&self, namespace: Option<&str>) -> EngramResult<u64> {
        self.with_reader(|conn| queries::embedded_scan::count_embedded(conn, namespace))
    }

    pub fn embedded_namespaces(&self) -> EngramResult<Vec<String>> {
        self.with_reader(queries::embedded_scan::embedded_namespaces)
    }

    // ── Mutation paths used by recall and consolidation ─────────────────

    pub fn bump_access(&self, ids: &[String], at: i64) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::access::bump_access(conn, ids, at))
    }

    pub fn apply_merge(
        &self,
        winner_id: &str,
        loser_ids: &[String],
        patch: &MergePatch,
    ) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::merge::apply_merge(conn, winner_id, loser_ids, patch))
    }

    pub fn decay_candidates(&self) -> EngramResult<Vec<DecayRow>> {
        self.with_reader(queries::maintenance::decay_candidates)
    }

    pub fn apply_confidence_updates(
        &self,
        updates: &[(String, f64)],
        updated_at: i64,
    ) -> EngramResult<()> {
        self.pool.writer.with_conn(|conn| {
            queries::maintenance::apply_confidence_updates(conn, updates, updated_at)
        })
    }

    pub fn stale_candidate_ids(
        &self,
        max_confidence: f64,
        min_age_days: f64,
        now_ms: i64,
    ) -> EngramResult<Vec<String>> {
        self.with_reader(|conn| {
            queries::maintenance::stale_candidate_ids(conn, max_confidence, min_age_days, now_ms)
        })
    }

    pub fn embedded_with_entity(&self) -> EngramResult<Vec<EntityRow>> {
        self.with_reader(|conn| queries::maintenance::embedded_with_entity(conn, self.dim))
    }

    // ── Contradictions ───────────────────────────────────────────────────

    pub fn put_contradiction(&self, c: &Contradiction) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::contradiction_ops::put_contradiction(conn, c))
    }

    pub fn unresolved_pair_exists(&self, id1: &str, id2: &str) -> EngramResult<bool> {
        self.with_reader(|conn| {
            queries::contradiction_ops::unresolved_pair_exists(conn, id1, id2)
        })
    }

    pub fn list_contradictions(
        &self,
        status: Option<ContradictionStatus>,
        category: Option<Category>,
        sort: ContradictionSort,
    ) -> EngramResult<(Vec<Contradiction>, u64)> {
        self.with_reader(|conn| {
            queries::contradiction_ops::list_contradictions(conn, status, category, sort)
        })
    }

    pub fn get_contradiction(&self, id: &str) -> EngramResult<Option<Contradiction>> {
        self.with_reader(|conn| queries::contradiction_ops::get_contradiction(conn, id))
    }

    pub fn resolve_contradiction(
        &self,
        id: &str,
        action: ResolutionAction,
        at: i64,
    ) -> EngramResult<Contradiction> {
        self.pool.writer.with_conn(|conn| {
            queries::contradiction_ops::resolve_contradiction(conn, id, action, at)
        })
    }

    // ── Status ───────────────────────────────────────────────────────────

    pub fn memory_stats(&self) -> EngramResult<MemoryStats> {
        self.with_reader(queries::status::memory_stats)
    }
}
