use regex::Regex;
use std::sync::LazyLock;

/// Words too common to be worth a search on their own.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "in", "on", "at", "to", "for", "with", "like", "than",
];

/// Keywords shorter than this are dropped.
pub const MIN_KEYWORD_LEN: usize = 3;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Split a free-text query into search keywords, keeping their order.
///
/// Tokens are lowercased and stripped of punctuation, then anything shorter
/// than [`MIN_KEYWORD_LEN`] characters or in [`STOP_WORDS`] is dropped.
pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| NON_WORD.replace_all(&token.to_lowercase(), "").into_owned())
        .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Every unordered pair `(i, j)` with `i < j`, in index order, joined by a space.
pub fn keyword_pairs(keywords: &[String]) -> Vec<String> {
    let mut pairs = Vec::new();
    for (i, first) in keywords.iter().enumerate() {
        for second in &keywords[i + 1..] {
            pairs.push(format!("{first} {second}"));
        }
    }
    pairs
}

/// For a query of exactly two words, the words swapped. Case is preserved.
pub fn reversed_two_words(query: &str) -> Option<String> {
    let words: Vec<&str> = query.split_whitespace().collect();
    match words.as_slice() {
        [first, second] => Some(format!("{second} {first}")),
        _ => None,
    }
}
