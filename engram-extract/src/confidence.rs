//! Confidence from wording: explicit statements raise the default, hedged
//! ones lower it. Only applies when the caller supplied no confidence.

use regex::Regex;
use std::sync::LazyLock;

use engram_core::constants::{
    CONFIDENCE_CERTAINTY_CAP, CONFIDENCE_HEDGE_FLOOR, DEFAULT_CONFIDENCE,
};

static RE_CERTAIN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:always|never|must|definitely|certainly|absolutely)\b").ok()
});
static RE_HEDGED: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:might|maybe|probably|perhaps|possibly|i think|not sure|unsure)\b").ok()
});

/// Default confidence adjusted by wording. Certainty caps at 0.95, hedging
/// floors at 0.5; hedging wins when both appear.
pub fn infer(content: &str) -> f64 {
    let hedged = RE_HEDGED.as_ref().is_some_and(|re| re.is_match(content));
    let certain = RE_CERTAIN.as_ref().is_some_and(|re| re.is_match(content));

    if hedged {
        (DEFAULT_CONFIDENCE - 0.15).max(CONFIDENCE_HEDGE_FLOOR)
    } else if certain {
        (DEFAULT_CONFIDENCE + 0.15).min(CONFIDENCE_CERTAINTY_CAP)
    } else {
        DEFAULT_CONFIDENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_statement_gets_default() {
        assert_eq!(infer("the service listens on 3838"), 0.8);
    }

    #[test]
    fn certainty_boosts_capped() {
        let c = infer("always use tabs for indentation");
        assert!(c > 0.8 && c <= 0.95);
    }

    #[test]
    fn hedging_lowers_floored() {
        let c = infer("this might be caused by the cache");
        assert!(c < 0.8 && c >= 0.5);
    }

    #[test]
    fn hedging_beats_certainty() {
        assert!(infer("it must probably be the network") < 0.8);
    }
}
