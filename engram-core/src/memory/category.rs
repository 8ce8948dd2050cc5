use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of knowledge a memory records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Preference,
    Fact,
    Pattern,
    Decision,
    Outcome,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Preference,
        Category::Fact,
        Category::Pattern,
        Category::Decision,
        Category::Outcome,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Preference => "preference",
            Category::Fact => "fact",
            Category::Pattern => "pattern",
            Category::Decision => "decision",
            Category::Outcome => "outcome",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preference" => Some(Category::Preference),
            "fact" => Some(Category::Fact),
            "pattern" => Some(Category::Pattern),
            "decision" => Some(Category::Decision),
            "outcome" => Some(Category::Outcome),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Fact
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a memory entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cli,
    Mcp,
    Api,
    Import,
    Manual,
    Desktop,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Cli => "cli",
            Source::Mcp => "mcp",
            Source::Api => "api",
            Source::Import => "import",
            Source::Manual => "manual",
            Source::Desktop => "desktop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cli" => Some(Source::Cli),
            "mcp" => Some(Source::Mcp),
            "api" => Some(Source::Api),
            "import" => Some(Source::Import),
            "manual" => Some(Source::Manual),
            "desktop" => Some(Source::Desktop),
            _ => None,
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Manual
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("opinion"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&Category::Preference).unwrap(),
            "\"preference\""
        );
        assert_eq!(serde_json::to_string(&Source::Mcp).unwrap(), "\"mcp\"");
    }
}
