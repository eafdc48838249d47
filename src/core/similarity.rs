use std::collections::HashSet;
use crate::core::text::{normalize_string, tokenize};

/// Share of overlapping words required for multi-word terms to match
const WORD_OVERLAP_THRESHOLD: f64 = 0.6;

/// Decide whether two free-text terms denote the same concept
///
/// Matching is permissive:
/// 1. equal after normalization,
/// 2. either contains the other,
/// 3. for multi-word terms, at least 60% of the shorter term's words
///    (ignoring words of two characters or fewer) appear in the other term
///    by equality or substring.
///
/// Containment means short terms match liberally ("ai" matches "hair").
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let s1 = normalize_string(a);
    let s2 = normalize_string(b);

    if s1 == s2 || s1.contains(&s2) || s2.contains(&s1) {
        return true;
    }

    let words1: Vec<&str> = s1.split_whitespace().collect();
    let words2: Vec<&str> = s2.split_whitespace().collect();

    if words1.len() <= 1 && words2.len() <= 1 {
        return false;
    }

    let (shorter, longer) = if words2.len() < words1.len() {
        (&words2, &words1)
    } else {
        (&words1, &words2)
    };

    let match_count = shorter
        .iter()
        .filter(|word| word.len() > 2)
        .filter(|word| {
            longer
                .iter()
                .any(|other| other.len() > 2 && (word.contains(*other) || other.contains(**word)))
        })
        .count();

    match_count > 0 && match_count as f64 / shorter.len() as f64 >= WORD_OVERLAP_THRESHOLD
}

/// Jaccard similarity (0-1) using fuzzy equality between elements
///
/// The intersection is built greedily: each element of `set_a`, in order,
/// consumes the first unconsumed element of `set_b` it fuzzy-matches, so the
/// result depends on element order.
pub fn jaccard_similarity<A, B>(set_a: &[A], set_b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let normalized_a: Vec<String> = set_a.iter().map(|s| normalize_string(s.as_ref())).collect();
    let normalized_b: Vec<String> = set_b.iter().map(|s| normalize_string(s.as_ref())).collect();

    let mut consumed = vec![false; normalized_b.len()];
    let mut intersection = 0usize;

    for term in &normalized_a {
        let hit = normalized_b
            .iter()
            .enumerate()
            .find(|(j, other)| !consumed[*j] && fuzzy_match(term, other))
            .map(|(j, _)| j);

        if let Some(j) = hit {
            consumed[j] = true;
            intersection += 1;
        }
    }

    let union = set_a.len() + set_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Fraction of the reference text's significant words found in the other texts
///
/// Only reference words of four characters or more can match, but every
/// reference token counts towards the denominator. The measure is
/// asymmetric: `text_similarity(a, &[b])` generally differs from
/// `text_similarity(b, &[a])`.
pub fn text_similarity(reference: &str, texts: &[&str]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }

    let reference_words = tokenize(reference);
    if reference_words.is_empty() {
        return 0.0;
    }

    let comparison_words = tokenize(&texts.join(" "));
    if comparison_words.is_empty() {
        return 0.0;
    }

    let vocabulary: HashSet<&str> = comparison_words.iter().map(String::as_str).collect();

    let matches = reference_words
        .iter()
        .filter(|word| word.len() >= 4 && vocabulary.contains(word.as_str()))
        .count();

    matches as f64 / reference_words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match_separators() {
        assert!(fuzzy_match("machine learning", "Machine-Learning"));
        assert!(fuzzy_match("data_science", "Data Science"));
    }

    #[test]
    fn test_fuzzy_match_substring() {
        assert!(fuzzy_match("python", "Python 3"));
        assert!(fuzzy_match("computer vision systems", "vision"));
    }

    #[test]
    fn test_fuzzy_match_short_term_false_positive() {
        // Known over-match: containment makes "ai" match "hair"
        assert!(fuzzy_match("ai", "hair"));
    }

    #[test]
    fn test_fuzzy_match_word_overlap() {
        // 2 of 3 words shared
        assert!(fuzzy_match("natural language processing", "language processing tasks"));
        // 1 of 2 words is below the threshold
        assert!(!fuzzy_match("deep learning", "learning systems"));
    }

    #[test]
    fn test_fuzzy_match_ignores_short_words() {
        // "of" never counts as overlap
        assert!(!fuzzy_match("theory of computation", "history of art"));
    }

    #[test]
    fn test_fuzzy_match_distinct_single_words() {
        assert!(!fuzzy_match("rust", "python"));
    }

    #[test]
    fn test_jaccard_empty() {
        let empty: Vec<String> = vec![];
        assert_eq!(jaccard_similarity(&empty, &["a"]), 0.0);
        assert_eq!(jaccard_similarity(&["a"], &empty), 0.0);
    }

    #[test]
    fn test_jaccard_identical() {
        let set = ["rust", "python", "statistics"];
        assert_eq!(jaccard_similarity(&set, &set), 1.0);
    }

    #[test]
    fn test_jaccard_partial() {
        let skills = ["machine learning", "python"];
        let tags = ["machine-learning", "deep learning"];
        let sim = jaccard_similarity(&skills, &tags);
        assert!((sim - 1.0 / 3.0).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_jaccard_no_double_counting() {
        // Both left terms fuzzy-match the single right term, only one may consume it
        let sim = jaccard_similarity(&["vision", "computer vision"], &["vision"]);
        assert!((sim - 0.5).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_text_similarity_empty_reference() {
        assert_eq!(text_similarity("", &["anything at all"]), 0.0);
        assert_eq!(text_similarity("the of and", &["anything"]), 0.0);
    }

    #[test]
    fn test_text_similarity_empty_comparison() {
        assert_eq!(text_similarity("robotics", &[]), 0.0);
        assert_eq!(text_similarity("robotics", &["", ""]), 0.0);
    }

    #[test]
    fn test_text_similarity_overlap() {
        let sim = text_similarity(
            "machine learning for robotics",
            &["Robotics lab using learning methods"],
        );
        assert!((sim - 2.0 / 3.0).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_text_similarity_is_asymmetric() {
        let forward = text_similarity("machine learning for robotics", &["robotics lab"]);
        let backward = text_similarity("robotics lab", &["machine learning for robotics"]);

        assert!((forward - 1.0 / 3.0).abs() < 1e-9);
        // "lab" is too short to match but still counts
        assert!((backward - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_text_similarity_joins_all_texts() {
        let sim = text_similarity("genomics proteomics", &["genomics", "proteomics"]);
        assert_eq!(sim, 1.0);
    }
}
