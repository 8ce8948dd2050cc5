//! The recall request shape and its validation.

use serde::Deserialize;

use engram_core::constants::{DEFAULT_RECALL_LIMIT, DEFAULT_RECALL_THRESHOLD, MAX_RECALL_LIMIT};
use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::Category;

/// Body of `POST /api/memories/search` and the `recall` tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecallRequest {
    pub query: String,
    pub namespace: Option<String>,
    pub category: Option<Category>,
    pub limit: Option<usize>,
    pub threshold: Option<f64>,
}

impl RecallRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            namespace: None,
            category: None,
            limit: None,
            threshold: None,
        }
    }

    /// Resolve and range-check limit and threshold.
    pub fn resolve(&self) -> EngramResult<(usize, f64)> {
        let limit = self.limit.unwrap_or(DEFAULT_RECALL_LIMIT);
        if !(1..=MAX_RECALL_LIMIT).contains(&limit) {
            return Err(EngramError::invalid_field(
                "limit",
                format!("must be in [1, {MAX_RECALL_LIMIT}]"),
            ));
        }
        let threshold = self.threshold.unwrap_or(DEFAULT_RECALL_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) || !threshold.is_finite() {
            return Err(EngramError::invalid_field(
                "threshold",
                "must be a number in [0, 1]",
            ));
        }
        Ok((limit, threshold))
    }
}
