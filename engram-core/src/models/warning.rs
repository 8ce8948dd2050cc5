use serde::{Deserialize, Serialize};

/// Non-fatal conditions attached to a response envelope without changing
/// its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The embedder was unavailable at ingest; the memory was stored
    /// without a vector and is reachable through keyword search only.
    DegradedEmbedding,
    /// A secret match was masked before storage.
    SecretMasked { pattern: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_tag_by_kind() {
        let v = serde_json::to_value(Warning::DegradedEmbedding).unwrap();
        assert_eq!(v["kind"], "degraded_embedding");
        let v =
            serde_json::to_value(Warning::SecretMasked { pattern: "jwt".into() }).unwrap();
        assert_eq!(v["kind"], "secret_masked");
        assert_eq!(v["pattern"], "jwt");
    }
}
