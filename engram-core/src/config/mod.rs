//! Layered configuration: TOML file under the data directory, falling back
//! to compiled defaults. Every tunable named in the component contracts
//! lives here.

mod consolidation_config;
mod embedding_config;
mod http_config;
mod recall_config;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{EngramError, EngramResult};

pub use consolidation_config::ConsolidationConfig;
pub use embedding_config::{EmbeddingConfig, EmbeddingProviderKind};
pub use http_config::HttpConfig;
pub use recall_config::{RecallConfig, RecallWeights};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    /// Data directory holding memory.db, models/, and logs/.
    /// None means "resolve the platform default" (~/.engram).
    pub data_dir: Option<PathBuf>,
    pub http: HttpConfig,
    pub embedding: EmbeddingConfig,
    pub recall: RecallConfig,
    pub consolidation: ConsolidationConfig,
}

impl EngramConfig {
    /// Load from a TOML file. A missing file is not an error; defaults apply.
    pub fn load(path: &Path) -> EngramResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| EngramError::Internal {
            message: format!("read config {}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| EngramError::Internal {
            message: format!("parse config {}: {e}", path.display()),
        })
    }

    /// Redacted summary for the status endpoint (paths only, no secrets to
    /// hide here, but keep the shape stable).
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "dataDir": self.data_dir.as_ref().map(|p| p.display().to_string()),
            "port": self.http.port,
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
            },
            "recall": {
                "scanCap": self.recall.scan_cap,
                "defaultLimit": self.recall.default_limit,
                "defaultThreshold": self.recall.default_threshold,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let c = EngramConfig::default();
        assert_eq!(c.http.port, 3838);
        assert_eq!(c.embedding.dimensions, 384);
        assert_eq!(c.recall.fts_candidates, 20);
        assert_eq!(c.recall.scan_cap, 10_000);
        assert_eq!(c.consolidation.duplicate_threshold, 0.92);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: EngramConfig = toml::from_str("[http]\nport = 4000\n").unwrap();
        assert_eq!(c.http.port, 4000);
        assert_eq!(c.recall.default_limit, 5);
    }
}
