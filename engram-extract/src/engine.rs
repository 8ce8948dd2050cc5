//! The extractor: pure function over content plus caller-supplied fields.

use engram_core::memory::Category;

use crate::{confidence, entity, rules, tags};

/// What the caller already specified; anything absent is filled in.
#[derive(Debug, Clone, Default)]
pub struct ProvidedFields {
    pub category: Option<Category>,
    pub entity: Option<String>,
    pub confidence: Option<f64>,
    pub tags: Vec<String>,
}

/// The resolved fields ingest writes to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub category: Category,
    pub entity: Option<String>,
    pub confidence: f64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Fill defaults. Caller-supplied values pass through untouched except
    /// tags, which are always normalized.
    pub fn extract(&self, content: &str, provided: &ProvidedFields) -> Extraction {
        Extraction {
            category: provided.category.unwrap_or_else(|| rules::classify(content)),
            entity: provided
                .entity
                .clone()
                .or_else(|| entity::detect(content)),
            confidence: provided
                .confidence
                .unwrap_or_else(|| confidence::infer(content)),
            tags: tags::normalize(&provided.tags),
        }
    }
}
