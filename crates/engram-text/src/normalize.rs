// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic text canonicalization: lowercase, tokenize, stem, rejoin.
//!
//! The normalized form serves as the embedding cache key, so the function
//! must be pure and idempotent: `normalize(normalize(x)) == normalize(x)`.

/// Canonicalize text for cache keys and fuzzy matching.
///
/// Lowercases, splits on whitespace and punctuation, stems each token
/// with a conservative suffix stripper, and rejoins with single spaces.
pub fn normalize(text: &str) -> String {
    tokenize(text)
        .iter()
        .map(|t| stem(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase and split on anything that is not alphanumeric.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip common English suffixes from an already-lowercased token.
///
/// Rules are applied until no rule fires, so every output is a fixed
/// point and `normalize` stays idempotent ("walkings" -> "walking" ->
/// "walk"). Minimum-stem guards avoid mangling short words ("sing",
/// "red", "is").
pub fn stem(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let next = stem_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Apply at most one suffix rule.
fn stem_once(t: &str) -> String {
    if let Some(base) = t.strip_suffix("sses") {
        return format!("{base}ss");
    }
    if t.len() > 4
        && let Some(base) = t.strip_suffix("ies")
    {
        return format!("{base}i");
    }
    if let Some(base) = t.strip_suffix("ing")
        && base.len() >= 3
    {
        return base.to_string();
    }
    if let Some(base) = t.strip_suffix("ed")
        && base.len() >= 3
    {
        return base.to_string();
    }
    if let Some(base) = t.strip_suffix("ly")
        && base.len() >= 3
    {
        return base.to_string();
    }
    if let Some(base) = t.strip_suffix('s')
        && base.len() >= 3
        && !base.ends_with('s')
        && !base.ends_with('u')
        && !base.ends_with('i')
    {
        return base.to_string();
    }

    t.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Hello   WORLD  "), "hello world");
    }

    #[test]
    fn splits_on_punctuation() {
        assert_eq!(normalize("I love hiking, really!"), "i love hik real");
    }

    #[test]
    fn stems_plurals_and_participles() {
        assert_eq!(stem("dogs"), "dog");
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("walked"), "walk");
        assert_eq!(stem("quickly"), "quick");
        assert_eq!(stem("classes"), "class");
        assert_eq!(stem("ponies"), "poni");
    }

    #[test]
    fn short_words_survive() {
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("red"), "red");
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("bus"), "bus");
        assert_eq!(stem("ing"), "ing");
    }

    #[test]
    fn stacked_suffixes_fully_strip() {
        assert_eq!(stem("walkings"), "walk");
    }

    #[test]
    fn stem_is_a_fixed_point() {
        for word in ["dogs", "running", "walked", "quickly", "classes", "ponies", "families"] {
            let once = stem(word);
            assert_eq!(stem(&once), once, "stem not idempotent for {word}");
        }
    }

    #[test]
    fn same_meaning_phrasings_converge() {
        // Near-identical phrasings should normalize close to each other.
        assert_eq!(normalize("I love hiking"), normalize("i LOVE hiking!"));
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  ...  "), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC{0,80}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalized_output_is_lowercase_single_spaced(s in "\\PC{0,80}") {
            let out = normalize(&s);
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.to_lowercase(), out.clone());
            prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
        }
    }
}
