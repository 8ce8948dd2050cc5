//! The service value threaded through every handler. Explicitly
//! constructed, with no ambient globals, so tests instantiate it against an
//! in-memory store and a stub embedder.

use std::sync::Arc;

use engram_consolidation::ConsolidationEngine;
use engram_core::config::EngramConfig;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::{Category, Memory, Source};
use engram_core::models::{
    ConsolidationOptions, ConsolidationReport, Contradiction, ContradictionStatus, RecallHit,
    ResolutionAction, StatusSnapshot,
};
use engram_core::time::now_ms;
use engram_core::traits::Cancellable;
use engram_embeddings::EmbeddingEngine;
use engram_ingest::{IngestEngine, IngestOutcome, IngestRequest};
use engram_recall::{RecallEngine, RecallRequest};
use engram_store::{ContradictionSort, StoreEngine};

pub struct Engram {
    store: Arc<StoreEngine>,
    embeddings: Arc<EmbeddingEngine>,
    ingest: IngestEngine,
    recall: RecallEngine,
    consolidation: ConsolidationEngine,
    config: EngramConfig,
}

impl Engram {
    pub fn new(
        config: EngramConfig,
        store: Arc<StoreEngine>,
        embeddings: Arc<EmbeddingEngine>,
    ) -> Self {
        let ingest = IngestEngine::new(store.clone(), Arc::new(embeddings.clone()));
        let recall = RecallEngine::new(
            store.clone(),
            Arc::new(embeddings.clone()),
            config.recall.clone(),
        );
        let consolidation = ConsolidationEngine::new(store.clone(), config.consolidation.clone());
        Self {
            store,
            embeddings,
            ingest,
            recall,
            consolidation,
            config,
        }
    }

    pub fn config(&self) -> &EngramConfig {
        &self.config
    }

    // ── Core operations ──────────────────────────────────────────────────

    pub fn ingest(
        &self,
        request: &IngestRequest,
        default_source: Source,
        cancel: &dyn Cancellable,
    ) -> EngramResult<IngestOutcome> {
        self.ingest.ingest(request, default_source, cancel)
    }

    pub fn recall(
        &self,
        request: &RecallRequest,
        cancel: &dyn Cancellable,
    ) -> EngramResult<Vec<RecallHit>> {
        self.recall.recall(request, cancel)
    }

    pub fn get(&self, id: &str) -> EngramResult<Memory> {
        self.store.get(id)?.ok_or_else(|| EngramError::NotFound {
            id: id.to_string(),
        })
    }

    pub fn list(
        &self,
        namespace: Option<&str>,
        category: Option<Category>,
        limit: usize,
        offset: usize,
    ) -> EngramResult<(Vec<Memory>, u64)> {
        self.store.list(namespace, category, limit, offset)
    }

    pub fn delete(&self, id: &str) -> EngramResult<()> {
        if self.store.delete_by_id(id)? {
            Ok(())
        } else {
            Err(EngramError::NotFound { id: id.to_string() })
        }
    }

    pub fn bulk_delete(&self, ids: &[String]) -> EngramResult<usize> {
        self.store.bulk_delete(ids)
    }

    pub fn consolidate(
        &self,
        options: ConsolidationOptions,
        cancel: &dyn Cancellable,
    ) -> EngramResult<ConsolidationReport> {
        self.consolidation.consolidate(options, cancel)
    }

    pub fn contradictions(
        &self,
        status: Option<ContradictionStatus>,
        category: Option<Category>,
        sort: ContradictionSort,
    ) -> EngramResult<(Vec<Contradiction>, u64)> {
        self.store.list_contradictions(status, category, sort)
    }

    pub fn resolve_contradiction(
        &self,
        id: &str,
        action: ResolutionAction,
    ) -> EngramResult<Contradiction> {
        self.store.resolve_contradiction(id, action, now_ms())
    }

    pub fn status(&self) -> EngramResult<StatusSnapshot> {
        Ok(StatusSnapshot {
            memory: self.store.memory_stats()?,
            model: self.embeddings.model_info(),
            config: self.config.summary(),
        })
    }

    /// Liveness: the store answers a trivial read.
    pub fn healthy(&self) -> bool {
        self.store.memory_stats().is_ok()
    }
}
