//! ONNX MiniLM provider via fastembed.
//!
//! The model loads lazily on first embed; that call may take seconds
//! (download on a cold cache, then ONNX session init); later calls run in
//! the 5–50 ms range. A failed init is sticky for a retry window so every
//! request doesn't re-attempt a heavy load.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use engram_core::errors::{EngramError, EngramResult};
use engram_core::traits::Embedder;

pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";

pub struct FastEmbedProvider {
    cache_dir: PathBuf,
    dimensions: usize,
    retry_window_secs: u64,
    model: Mutex<Option<TextEmbedding>>,
    ready: AtomicBool,
    /// Epoch seconds of the last failed init; 0 means never failed.
    last_failure: AtomicI64,
}

impl FastEmbedProvider {
    pub fn new(cache_dir: PathBuf, dimensions: usize, retry_window_secs: u64) -> Self {
        Self {
            cache_dir,
            dimensions,
            retry_window_secs,
            model: Mutex::new(None),
            ready: AtomicBool::new(false),
            last_failure: AtomicI64::new(0),
        }
    }

    fn now_secs() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn in_failure_window(&self) -> bool {
        let at = self.last_failure.load(Ordering::Relaxed);
        at != 0 && Self::now_secs() - at < self.retry_window_secs as i64
    }

    fn init_model(&self) -> EngramResult<TextEmbedding> {
        tracing::info!(cache_dir = %self.cache_dir.display(), "loading embedding model");
        TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(self.cache_dir.clone()),
        )
        .map_err(|e| {
            tracing::warn!(error = %e, "embedding model init failed");
            self.last_failure.store(Self::now_secs(), Ordering::Relaxed);
            EngramError::EmbedderUnavailable
        })
    }
}

/// Whether model artifacts exist under a cache dir, and their total size.
pub fn cached_artifacts(cache_dir: &std::path::Path) -> (bool, Option<u64>) {
    match dir_size(cache_dir) {
        Some(0) | None => (false, None),
        Some(n) => (true, Some(n)),
    }
}

fn dir_size(dir: &std::path::Path) -> Option<u64> {
    let mut total = 0u64;
    let mut stack = vec![dir.to_path_buf()];
    if !dir.exists() {
        return None;
    }
    while let Some(d) = stack.pop() {
        let entries = std::fs::read_dir(&d).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if let Ok(meta) = entry.metadata() {
                total += meta.len();
            }
        }
    }
    Some(total)
}

impl Embedder for FastEmbedProvider {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        if self.in_failure_window() {
            return Err(EngramError::EmbedderUnavailable);
        }

        let mut guard = self
            .model
            .lock()
            .map_err(|e| EngramError::internal(format!("embedder lock poisoned: {e}")))?;
        if guard.is_none() {
            *guard = Some(self.init_model()?);
            self.ready.store(true, Ordering::Relaxed);
            self.last_failure.store(0, Ordering::Relaxed);
        }

        let model = guard.as_mut().ok_or(EngramError::EmbedderUnavailable)?;
        let mut vectors = model
            .embed(vec![text], None)
            .map_err(|e| {
                tracing::warn!(error = %e, "embedding inference failed");
                EngramError::EmbedderUnavailable
            })?;
        let mut v = vectors
            .pop()
            .ok_or(EngramError::EmbedderUnavailable)?;

        // The model emits normalized vectors; renormalize so downstream
        // cosine can rely on unit length exactly.
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn is_available(&self) -> bool {
        // Fast path: loaded, or never failed (optimistic before first use).
        self.ready.load(Ordering::Relaxed) || !self.in_failure_window()
    }
}
