//! Token Normalization
//!
//! Reference sentences carry punctuation and casing that the recognizer's
//! word list does not. Both sides are normalized with the same function so
//! the aligner and the sentence gate can never disagree about a match.

/// Punctuation stripped from tokens before comparison
const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '…',
];

/// Normalize a word token for comparison: lowercase, punctuation removed.
///
/// Total and idempotent; punctuation-only input normalizes to `""`.
pub fn normalize_token(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect()
}

/// Split a reference sentence into its word tokens
pub fn reference_words(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}
