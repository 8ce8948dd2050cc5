//! Entity detection: a weighted lexicon of known tech tokens, then a
//! camel/snake identifier scan as a weaker signal.

use regex::Regex;
use std::sync::LazyLock;

/// Known subjects, heaviest first. Lookup is case-insensitive; the listed
/// form is what gets stored.
const LEXICON: &[(&str, u32)] = &[
    ("kubernetes", 10),
    ("postgresql", 10),
    ("postgres", 9),
    ("typescript", 9),
    ("javascript", 9),
    ("docker", 9),
    ("sqlite", 8),
    ("mysql", 8),
    ("redis", 8),
    ("python", 8),
    ("rust", 8),
    ("react", 7),
    ("graphql", 7),
    ("neovim", 7),
    ("github", 7),
    ("linux", 6),
    ("macos", 6),
    ("windows", 6),
    ("vim", 6),
    ("git", 6),
    ("aws", 6),
    ("gcp", 6),
    ("azure", 6),
    ("node", 5),
    ("npm", 5),
    ("cargo", 5),
    ("tabs", 4),
    ("spaces", 4),
];

static RE_CAMEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[a-z][a-z0-9]*(?:[A-Z][a-z0-9]+)+\b").ok());
static RE_SNAKE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b[a-z][a-z0-9]*(?:_[a-z0-9]+)+\b").ok());

/// Identifier matches score below the whole lexicon.
const IDENTIFIER_WEIGHT: u32 = 3;

/// Pick the highest-weighted subject mentioned in the content, or none.
/// Ties break to the earliest mention.
pub fn detect(content: &str) -> Option<String> {
    let lowered = content.to_lowercase();
    let mut best: Option<(u32, usize, String)> = None;

    for (token, weight) in LEXICON {
        if let Some(pos) = find_word(&lowered, token) {
            let candidate = (*weight, pos, token.to_string());
            if better(&best, &candidate) {
                best = Some(candidate);
            }
        }
    }

    for re in [&RE_CAMEL, &RE_SNAKE] {
        if let Some(re) = re.as_ref() {
            if let Some(m) = re.find(content) {
                let candidate = (IDENTIFIER_WEIGHT, m.start(), m.as_str().to_string());
                if better(&best, &candidate) {
                    best = Some(candidate);
                }
            }
        }
    }

    best.map(|(_, _, token)| token)
}

fn better(current: &Option<(u32, usize, String)>, candidate: &(u32, usize, String)) -> bool {
    match current {
        None => true,
        Some((w, pos, _)) => candidate.0 > *w || (candidate.0 == *w && candidate.1 < *pos),
    }
}

/// Word-boundary search without a per-token regex.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(needle) {
        let start = from + rel;
        let end = start + needle.len();
        let before_ok = start == 0
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        from = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_token_wins() {
        assert_eq!(detect("always run docker compose up"), Some("docker".into()));
    }

    #[test]
    fn heavier_token_beats_lighter() {
        assert_eq!(
            detect("use git hooks with docker builds"),
            Some("docker".into())
        );
    }

    #[test]
    fn identifier_scan_as_fallback() {
        assert_eq!(
            detect("set max_retries to 5 in the worker"),
            Some("max_retries".into())
        );
        assert_eq!(
            detect("the configLoader caches aggressively"),
            Some("configLoader".into())
        );
    }

    #[test]
    fn substring_does_not_match() {
        // "rusty" must not match "rust".
        assert_eq!(detect("a rusty old nail"), None);
    }

    #[test]
    fn nothing_recognized_is_none() {
        assert_eq!(detect("remember to water the plants"), None);
    }
}
