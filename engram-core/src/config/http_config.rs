use serde::{Deserialize, Serialize};

use crate::constants;

/// HTTP surface configuration. The bind address is always loopback; only
/// the port is tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    /// Per-request timeout for ingest (seconds).
    pub ingest_timeout_secs: u64,
    /// Per-request timeout for recall (seconds).
    pub recall_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: constants::DEFAULT_PORT,
            ingest_timeout_secs: constants::INGEST_TIMEOUT_SECS,
            recall_timeout_secs: constants::RECALL_TIMEOUT_SECS,
        }
    }
}
