use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate memory counts for the status surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total: u64,
    pub with_embeddings: u64,
    /// Keyed by category string; sorted for deterministic output.
    pub by_category: BTreeMap<String, u64>,
    pub by_namespace: BTreeMap<String, u64>,
}

/// Embedding model state for the status surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub available: bool,
    /// Whether model artifacts are already on disk.
    pub cached: bool,
    /// Artifact size in bytes, when cached.
    pub size: Option<u64>,
}

/// The `/api/status` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub memory: MemoryStats,
    pub model: ModelInfo,
    pub config: serde_json::Value,
}
