//! Candidate cleanup and string similarity

use regex::Regex;
use std::sync::LazyLock;

static INTERROGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(is|does|do|are|what|how|where|when|which|why|who)\b")
        .expect("interrogative pattern is valid")
});

/// Clean one raw generator output into a single-line question
///
/// Only reformats: trims, collapses whitespace, drops one pair of wrapping
/// quotes, and ends the text with `?` (replacing a trailing `.` or `!`)
/// when it reads like a question but lacks one.
/// Returns an empty string when nothing usable is left.
pub fn normalize_candidate(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut text = strip_wrapping_quotes(&collapsed).trim().to_string();

    if text.is_empty() {
        return text;
    }

    if !text.ends_with('?') && INTERROGATIVE.is_match(&text) {
        let kept = text.trim_end_matches(['.', '!', ' ']).len();
        text.truncate(kept);
        text.push('?');
    }
    text
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close) {
            return &text[open.len_utf8()..text.len() - close.len_utf8()];
        }
    }
    text
}

/// Case-insensitive similarity in [0, 1]
///
/// Normalized Levenshtein ratio: 1.0 for identical strings, near 0 for
/// disjoint ones, symmetric in its arguments.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// True when `candidate` scores at or above `threshold` against any of `seen`
pub fn is_near_duplicate<S: AsRef<str>>(candidate: &str, seen: &[S], threshold: f64) -> bool {
    seen.iter()
        .any(|s| similarity(candidate, s.as_ref()) >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_candidate("  Are   the\n ingredients\ttested? "),
            "Are the ingredients tested?"
        );
    }

    #[test]
    fn test_normalize_appends_question_mark() {
        assert_eq!(
            normalize_candidate("What farming practices were used"),
            "What farming practices were used?"
        );
        assert_eq!(
            normalize_candidate("how is the battery tested"),
            "how is the battery tested?"
        );
    }

    #[test]
    fn test_normalize_replaces_trailing_period() {
        assert_eq!(
            normalize_candidate("Which labs tested the serum."),
            "Which labs tested the serum?"
        );
    }

    #[test]
    fn test_normalize_keeps_existing_question_mark() {
        assert_eq!(normalize_candidate("Is it tested?"), "Is it tested?");
    }

    #[test]
    fn test_normalize_needs_whole_word_interrogative() {
        // "This" contains "is" but not as a word
        assert_eq!(
            normalize_candidate("Third-party lab results"),
            "Third-party lab results"
        );
        assert_eq!(normalize_candidate("This product"), "This product");
    }

    #[test]
    fn test_normalize_strips_wrapping_quotes() {
        assert_eq!(
            normalize_candidate("\"Are allergens disclosed?\""),
            "Are allergens disclosed?"
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_candidate(""), "");
        assert_eq!(normalize_candidate("   \n\t"), "");
        assert_eq!(normalize_candidate("\"\""), "");
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("What is it?", "WHAT IS IT?"), 1.0);
        assert!(similarity("aaaa", "zzzz") < 0.01);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = "Are third-party lab tests available?";
        let b = "Are lab tests available for contaminants?";
        assert_eq!(similarity(a, b), similarity(b, a));
    }

    #[test]
    fn test_near_duplicate_detection() {
        let seen = vec!["What farming practices were used?".to_string()];
        assert!(is_near_duplicate("what farming practices were used?", &seen, 0.75));
        assert!(is_near_duplicate("What farming practice was used?", &seen, 0.75));
        assert!(!is_near_duplicate("Is a Certificate of Analysis available?", &seen, 0.75));
        assert!(!is_near_duplicate::<String>("anything", &[], 0.75));
    }
}
