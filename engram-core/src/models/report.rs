use serde::{Deserialize, Serialize};

/// Which consolidation passes to run. All default off; cleanup in
/// particular never runs implicitly.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConsolidationOptions {
    pub detect_duplicates: bool,
    pub detect_contradictions: bool,
    pub apply_decay: bool,
    pub cleanup_stale: bool,
}

/// Counts returned by a consolidation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationReport {
    pub duplicates_removed: usize,
    pub contradictions_detected: usize,
    pub memories_decayed: usize,
    pub stale_deleted: usize,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}
