use serde::{Deserialize, Serialize};
use std::fmt;

/// A detected pairwise conflict between two memories about the same entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contradiction {
    pub id: String,
    pub memory1_id: String,
    pub memory2_id: String,
    /// The entity both memories are about. Detection skips null-entity rows.
    pub entity: String,
    /// The detector's certainty in the conflict, not either memory's.
    pub confidence: f64,
    /// Short explanation naming the trigger (polarity, category overlap).
    pub reason: String,
    pub status: ContradictionStatus,
    /// Null until resolved.
    pub resolution_action: Option<ResolutionAction>,
    /// Epoch milliseconds.
    pub detected_at: i64,
    pub resolved_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionStatus {
    Unresolved,
    Resolved,
    Dismissed,
}

impl ContradictionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unresolved" => Some(Self::Unresolved),
            "resolved" => Some(Self::Resolved),
            "dismissed" => Some(Self::Dismissed),
            _ => None,
        }
    }
}

impl fmt::Display for ContradictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a contradiction was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionAction {
    /// Keep memory1, delete memory2.
    KeepFirst,
    /// Keep memory2, delete memory1.
    KeepSecond,
    /// Keep both; the conflict is acknowledged.
    KeepBoth,
    /// Not a real conflict.
    Dismiss,
}

impl ResolutionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepFirst => "keep_first",
            Self::KeepSecond => "keep_second",
            Self::KeepBoth => "keep_both",
            Self::Dismiss => "dismiss",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "keep_first" => Some(Self::KeepFirst),
            "keep_second" => Some(Self::KeepSecond),
            "keep_both" => Some(Self::KeepBoth),
            "dismiss" => Some(Self::Dismiss),
            _ => None,
        }
    }

    /// The status a contradiction lands in after this action.
    pub fn final_status(self) -> ContradictionStatus {
        match self {
            Self::Dismiss => ContradictionStatus::Dismissed,
            _ => ContradictionStatus::Resolved,
        }
    }
}
