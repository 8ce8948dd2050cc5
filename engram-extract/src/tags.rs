//! Tag normalization: trim, lowercase, dedupe preserving first appearance.

use std::collections::HashSet;

pub fn normalize(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tag in tags {
        let t = tag.trim().to_lowercase();
        if t.is_empty() {
            continue;
        }
        if seen.insert(t.clone()) {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_lowercases_and_dedupes_in_order() {
        let input = vec![
            "  Editor ".to_string(),
            "theme".to_string(),
            "editor".to_string(),
            "".to_string(),
            "Theme".to_string(),
        ];
        assert_eq!(normalize(&input), vec!["editor", "theme"]);
    }
}
