//! Ordered category rules. First match wins; unmatched content is a fact.

use regex::Regex;
use std::sync::LazyLock;

use engram_core::memory::Category;

/// One classification rule.
pub struct CategoryRule {
    pub name: &'static str,
    pub category: Category,
    pub regex: &'static LazyLock<Option<Regex>>,
}

macro_rules! category_rule {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

category_rule!(
    RE_PREFERENCE,
    r"(?i)\b(?:i|we) (?:prefer|like|love|hate|dislike|favor|always use|never use)\b|\bmy (?:favorite|preferred)\b"
);
category_rule!(
    RE_DECISION,
    r"(?i)\b(?:decided to|decision|we chose|chose to|going with|settled on|opted for|will use)\b"
);
category_rule!(
    RE_PATTERN,
    r"(?i)\b(?:whenever|every time|each time|usually|tends? to|keeps? (?:happening|failing)|recurring)\b"
);
category_rule!(
    RE_OUTCOME,
    r"(?i)\b(?:resulted in|led to|caused|turned out|ended up|outcome was|as a result)\b"
);

/// The ordered rule table. Order is load-bearing: preference wording also
/// matches the broader pattern/outcome phrasings below it.
pub fn all_rules() -> [CategoryRule; 4] {
    [
        CategoryRule {
            name: "preference_wording",
            category: Category::Preference,
            regex: &RE_PREFERENCE,
        },
        CategoryRule {
            name: "decision_wording",
            category: Category::Decision,
            regex: &RE_DECISION,
        },
        CategoryRule {
            name: "pattern_wording",
            category: Category::Pattern,
            regex: &RE_PATTERN,
        },
        CategoryRule {
            name: "outcome_wording",
            category: Category::Outcome,
            regex: &RE_OUTCOME,
        },
    ]
}

/// Classify content; first matching rule wins, fallback `fact`.
pub fn classify(content: &str) -> Category {
    for rule in all_rules() {
        if let Some(re) = rule.regex.as_ref() {
            if re.is_match(content) {
                return rule.category;
            }
        }
    }
    Category::Fact
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_person_preference() {
        assert_eq!(classify("I prefer dark mode"), Category::Preference);
        assert_eq!(classify("we like small commits"), Category::Preference);
    }

    #[test]
    fn decision_wording() {
        assert_eq!(
            classify("decided to use PostgreSQL in production"),
            Category::Decision
        );
    }

    #[test]
    fn pattern_wording() {
        assert_eq!(
            classify("the build fails every time the cache is cold"),
            Category::Pattern
        );
    }

    #[test]
    fn outcome_wording() {
        assert_eq!(
            classify("switching to arm64 led to a 2x speedup"),
            Category::Outcome
        );
    }

    #[test]
    fn unmatched_is_fact() {
        assert_eq!(classify("the API listens on port 3838"), Category::Fact);
    }

    #[test]
    fn order_prefers_preference_over_pattern() {
        // Contains both preference and pattern wording.
        assert_eq!(
            classify("I prefer rebasing every time I pull"),
            Category::Preference
        );
    }
}
