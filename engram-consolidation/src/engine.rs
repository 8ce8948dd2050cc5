//! ConsolidationEngine: runs the option-gated passes under a
//! single-execution guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use engram_core::config::ConsolidationConfig;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{ConsolidationOptions, ConsolidationReport};
use engram_core::traits::Cancellable;
use engram_store::StoreEngine;

use crate::passes;

pub struct ConsolidationEngine {
    store: Arc<StoreEngine>,
    config: ConsolidationConfig,
    /// Only one consolidation runs at a time.
    running: Arc<AtomicBool>,
}

impl ConsolidationEngine {
    pub fn new(store: Arc<StoreEngine>, config: ConsolidationConfig) -> Self {
        Self {
            store,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Run the flagged passes in order: duplicates, contradictions, decay,
    /// stale cleanup. Cancellation stops at the next batch boundary; work
    /// already committed stays committed and is counted in the report.
    pub fn consolidate(
        &self,
        options: ConsolidationOptions,
        cancel: &dyn Cancellable,
    ) -> EngramResult<ConsolidationReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngramError::internal("consolidation already in progress"));
        }

        let started = Instant::now();
        let result = self.run_passes(options, cancel);
        self.running.store(false, Ordering::SeqCst);

        let mut report = result?;
        report.duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            duplicates = report.duplicates_removed,
            contradictions = report.contradictions_detected,
            decayed = report.memories_decayed,
            stale = report.stale_deleted,
            duration_ms = report.duration_ms,
            "consolidation complete"
        );
        Ok(report)
    }

    fn run_passes(
        &self,
        options: ConsolidationOptions,
        cancel: &dyn Cancellable,
    ) -> EngramResult<ConsolidationReport> {
        let mut report = ConsolidationReport::default();

        if options.detect_duplicates && !cancel.is_cancelled() {
            report.duplicates_removed = passes::duplicates::run(&self.store, &self.config, cancel)?;
        }
        if options.detect_contradictions && !cancel.is_cancelled() {
            report.contradictions_detected =
                passes::contradictions::run(&self.store, &self.config, cancel)?;
        }
        if options.apply_decay && !cancel.is_cancelled() {
            report.memories_decayed = passes::decay::run(&self.store, &self.config, cancel)?;
        }
        if options.cleanup_stale && !cancel.is_cancelled() {
            report.stale_deleted = passes::stale::run(&self.store, &self.config, cancel)?;
        }

        Ok(report)
    }
}
