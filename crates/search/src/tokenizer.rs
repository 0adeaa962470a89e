//! Tokenizer for command lines
//!
//! Shell commands are literal: no lowercasing, no stemming, no stopwords.
//! Newlines count as separators so multi-line commands tokenize like their
//! single-line form.

/// Split a command line into tokens
///
/// - Split on whitespace (newlines included)
/// - Drop empty pieces produced by repeated separators
/// - Preserve case and punctuation
///
/// # Example
///
/// ```
/// use recall_search::tokenizer::tokenize;
///
/// let tokens = tokenize("git commit -m  foo");
/// assert_eq!(tokens, vec!["git", "commit", "-m", "foo"]);
/// ```
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Every leading prefix of a token, shortest first
///
/// Prefixes are cut on `char` boundaries, so a token of `n` characters yields
/// exactly `n` prefixes and the last one is the token itself.
///
/// # Example
///
/// ```
/// use recall_search::tokenizer::edge_ngrams;
///
/// assert_eq!(edge_ngrams("git"), vec!["g", "gi", "git"]);
/// ```
pub fn edge_ngrams(token: &str) -> Vec<&str> {
    token
        .char_indices()
        .map(|(i, c)| &token[..i + c.len_utf8()])
        .collect()
}
