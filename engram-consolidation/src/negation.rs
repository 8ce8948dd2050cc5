//! Negation polarity over a closed token list.

/// Single-word negation tokens, matched on word boundaries.
const NEGATION_WORDS: &[&str] = &[
    "not", "never", "no", "don't", "dont", "doesn't", "doesnt", "won't", "wont", "avoid",
    "stop", "stopped", "without",
];

/// Multi-word negation phrases, matched as substrings.
const NEGATION_PHRASES: &[&str] = &["no longer", "not anymore"];

/// Whether the content carries a negation token from the closed list.
pub fn has_negation(content: &str) -> bool {
    let lowered = content.to_lowercase();
    if NEGATION_PHRASES.iter().any(|p| lowered.contains(p)) {
        return true;
    }
    lowered
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .any(|word| NEGATION_WORDS.contains(&word))
}

/// Token set for overlap measurement (lowercased, len >= 2).
pub fn token_set(content: &str) -> std::collections::HashSet<String> {
    content
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.len() >= 2)
        .map(str::to_string)
        .collect()
}

/// Jaccard overlap of two token sets.
pub fn jaccard(a: &std::collections::HashSet<String>, b: &std::collections::HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_word_negation() {
        assert!(has_negation("I never use tabs for indentation"));
        assert!(has_negation("don't deploy on fridays"));
        assert!(!has_negation("I always use tabs for indentation"));
    }

    #[test]
    fn detects_phrase_negation() {
        assert!(has_negation("we no longer use jenkins"));
    }

    #[test]
    fn notable_is_not_negation() {
        assert!(!has_negation("a notable improvement in nothingness-adjacent naming"));
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a = token_set("alpha beta");
        let b = token_set("gamma delta");
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_of_identical_sets_is_one() {
        let a = token_set("alpha beta gamma");
        assert_eq!(jaccard(&a, &a), 1.0);
    }
}
