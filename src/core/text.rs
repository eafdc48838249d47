/// Punctuation replaced by spaces before tokenizing
const PUNCTUATION: [char; 10] = [',', '.', ';', ':', '!', '?', '(', ')', '[', ']'];

/// Common English words that carry no matching signal
const STOP_WORDS: [&str; 40] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to",
    "for", "of", "with", "by", "from", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
];

/// Normalize a term for comparison
///
/// Lowercases, turns `-` and `_` into spaces and collapses whitespace runs,
/// so "Machine-Learning" and "machine  learning" compare equal.
pub fn normalize_string(s: &str) -> String {
    s.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split free text into significant lowercase words
///
/// Punctuation becomes whitespace; stop words and tokens of two characters
/// or fewer are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(PUNCTUATION, " ")
        .split_whitespace()
        .filter(|word| word.len() > 2 && !is_stop_word(word))
        .map(str::to_string)
        .collect()
}

#[inline]
fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
