use serde::{Deserialize, Serialize};

use super::category::{Category, Source};
use super::confidence::Confidence;
use crate::constants;

/// The single primary entity: one stored unit of agent-addressable knowledge.
///
/// Created by ingest; mutated only by recall's access-stat update, by
/// consolidation, or by explicit delete. `content` is immutable after
/// creation; edits create new memories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v4, assigned at ingest, immutable.
    pub id: String,
    /// Natural-language text, 1–8192 characters after trim.
    pub content: String,
    /// Short token naming the subject (e.g. "docker").
    pub entity: Option<String>,
    pub category: Category,
    /// Decays over time; see the consolidation decay pass.
    pub confidence: Confidence,
    /// Unit-length vector, dimension per the meta row. Absent when the
    /// embedder was unavailable at ingest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub source: Source,
    /// Opaque, case-sensitive scope key. Never crossed implicitly.
    pub namespace: String,
    /// Deduped on store, first-appearance order preserved.
    pub tags: Vec<String>,
    /// Incremented only by successful recall returning this row.
    pub access_count: u64,
    /// Per-memory override of the global decay, in [0, 0.1].
    pub decay_rate: f64,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
    pub last_accessed: Option<i64>,
}

impl Memory {
    /// Construct a fresh memory with server-assigned fields zeroed; ingest
    /// fills id and timestamps.
    pub fn new(content: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            content: content.into(),
            entity: None,
            category: Category::default(),
            confidence: Confidence::default(),
            embedding: None,
            source: Source::default(),
            namespace: namespace.into(),
            tags: Vec::new(),
            access_count: 0,
            decay_rate: constants::DEFAULT_DECAY_RATE,
            created_at: 0,
            updated_at: 0,
            last_accessed: None,
        }
    }

    /// The instant recency scoring decays from: last access, falling back
    /// to creation.
    pub fn recency_anchor(&self) -> i64 {
        self.last_accessed.unwrap_or(self.created_at)
    }

    /// The instant decay is measured from: the later of last access and
    /// last update.
    pub fn last_touch(&self) -> i64 {
        match self.last_accessed {
            Some(a) => a.max(self.updated_at),
            None => self.updated_at,
        }
    }

    /// Check the stored-row invariants that must hold after every commit.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.content.is_empty() || self.content.chars().count() > constants::MAX_CONTENT_CHARS {
            return Err(format!("content length out of range for {}", self.id));
        }
        if !Confidence::in_range(self.confidence.value()) {
            return Err(format!("confidence out of range for {}", self.id));
        }
        if !(0.0..=constants::MAX_DECAY_RATE).contains(&self.decay_rate) {
            return Err(format!("decay_rate out of range for {}", self.id));
        }
        if self.created_at > self.updated_at {
            return Err(format!("created_at > updated_at for {}", self.id));
        }
        if let Some(at) = self.last_accessed {
            if at < self.created_at {
                return Err(format!("last_accessed < created_at for {}", self.id));
            }
        }
        Ok(())
    }
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
