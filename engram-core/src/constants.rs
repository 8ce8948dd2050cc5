//! Service-wide defaults and limits.

/// Default HTTP port for the local API.
pub const DEFAULT_PORT: u16 = 3838;

/// Namespace used when the caller does not supply one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Maximum memory content length in characters (after trim).
pub const MAX_CONTENT_CHARS: usize = 8192;

/// Maximum tag token length.
pub const MAX_TAG_CHARS: usize = 64;

/// Maximum namespace key length.
pub const MAX_NAMESPACE_CHARS: usize = 128;

/// Default confidence assigned when the caller supplies none.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Ceiling applied when certainty wording boosts confidence.
pub const CONFIDENCE_CERTAINTY_CAP: f64 = 0.95;

/// Floor applied when hedged wording lowers confidence.
pub const CONFIDENCE_HEDGE_FLOOR: f64 = 0.5;

/// Default per-memory decay rate.
pub const DEFAULT_DECAY_RATE: f64 = 0.01;

/// Upper bound for the per-memory decay rate.
pub const MAX_DECAY_RATE: f64 = 0.1;

/// Default embedding dimensionality (all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Seconds to wait after an embedder failure before retrying init.
pub const EMBED_RETRY_WINDOW_SECS: u64 = 30;

/// Default recall result limit.
pub const DEFAULT_RECALL_LIMIT: usize = 5;

/// Maximum recall result limit.
pub const MAX_RECALL_LIMIT: usize = 100;

/// Default similarity threshold for recall filtering.
pub const DEFAULT_RECALL_THRESHOLD: f64 = 0.3;

/// Number of FTS hits gathered as recall candidates.
pub const FTS_CANDIDATE_LIMIT: usize = 20;

/// Cap on the embedded-memory scan during recall candidate gathering.
pub const EMBEDDED_SCAN_CAP: usize = 10_000;

/// Access-frequency score saturates around this many accesses.
pub const ACCESS_SATURATION: u64 = 100;

/// Cosine similarity at or above which two memories are duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.92;

/// Cosine similarity at or above which two memories are topically close
/// enough for contradiction checks.
pub const CONTRADICTION_THRESHOLD: f64 = 0.7;

/// Maximum rows mutated per writer acquisition during consolidation.
pub const MERGE_BATCH_SIZE: usize = 100;

/// Confidence below which a memory is a stale-cleanup candidate.
pub const STALE_CONFIDENCE: f64 = 0.15;

/// Age in days beyond which a memory is a stale-cleanup candidate.
pub const STALE_AGE_DAYS: f64 = 90.0;

/// Sentinel written over masked secret matches.
pub const REDACTION_SENTINEL: &str = "[REDACTED]";

/// Per-request timeout for ingest, in seconds.
pub const INGEST_TIMEOUT_SECS: u64 = 10;

/// Per-request timeout for recall, in seconds.
pub const RECALL_TIMEOUT_SECS: u64 = 5;

/// Highest schema version this binary can open.
pub const SCHEMA_VERSION: u32 = 1;

/// FTS tokenizer pinned at schema creation and recorded in the meta row.
pub const FTS_TOKENIZER: &str = "unicode61 remove_diacritics 2";
