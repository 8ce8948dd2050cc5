//! The ingest request shape and its validation.

use serde::Deserialize;

use engram_core::constants::{MAX_CONTENT_CHARS, MAX_NAMESPACE_CHARS, MAX_TAG_CHARS};
use engram_core::errors::{EngramError, EngramResult};
use engram_core::memory::{Category, Confidence, Source};

/// Body of `POST /api/memories` and the `remember` tool. Unknown fields
/// are rejected on write.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestRequest {
    pub content: String,
    pub category: Option<Category>,
    pub entity: Option<String>,
    pub confidence: Option<f64>,
    pub namespace: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source: Option<Source>,
}

impl IngestRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Field-level validation ahead of the pipeline. Content emptiness is
    /// the pipeline's own first step and not checked here.
    pub fn validate(&self) -> EngramResult<()> {
        if self.content.trim().chars().count() > MAX_CONTENT_CHARS {
            return Err(EngramError::invalid_field(
                "content",
                format!("longer than {MAX_CONTENT_CHARS} characters"),
            ));
        }
        if let Some(c) = self.confidence {
            if !Confidence::in_range(c) {
                return Err(EngramError::invalid_field(
                    "confidence",
                    "must be a number in [0, 1]",
                ));
            }
        }
        if let Some(ns) = &self.namespace {
            if ns.is_empty() || ns.chars().count() > MAX_NAMESPACE_CHARS {
                return Err(EngramError::invalid_field(
                    "namespace",
                    format!("must be 1..={MAX_NAMESPACE_CHARS} characters"),
                ));
            }
            if ns.chars().any(|c| c.is_control()) {
                return Err(EngramError::invalid_field(
                    "namespace",
                    "control characters are not allowed",
                ));
            }
        }
        if let Some(tags) = &self.tags {
            for tag in tags {
                if tag.chars().count() > MAX_TAG_CHARS {
                    return Err(EngramError::invalid_field(
                        "tags",
                        format!("tag longer than {MAX_TAG_CHARS} characters"),
                    ));
                }
            }
        }
        if let Some(entity) = &self.entity {
            if entity.chars().count() > MAX_TAG_CHARS {
                return Err(EngramError::invalid_field(
                    "entity",
                    format!("longer than {MAX_TAG_CHARS} characters"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_str::<IngestRequest>(
            r#"{"content": "x", "importance": "high"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn out_of_range_confidence_is_invalid() {
        let mut req = IngestRequest::new("x");
        req.confidence = Some(1.2);
        assert_eq!(req.validate().unwrap_err().kind(), "InvalidField");
    }

    #[test]
    fn control_characters_in_namespace_are_invalid() {
        let mut req = IngestRequest::new("x");
        req.namespace = Some("bad\nns".into());
        assert_eq!(req.validate().unwrap_err().kind(), "InvalidField");
    }
}
