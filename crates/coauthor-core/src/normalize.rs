//! Author name normalization.
//!
//! Raw author strings come from spreadsheets and often carry list-literal
//! punctuation (`['Ada Lovelace', 'C. Babbage']`), stray quotes and
//! inconsistent spacing. `normalize` maps all of those spellings onto a
//! single key so that one person is one graph node.

/// Normalizes a raw author string into a graph key.
///
/// Lowercases, drops every character that is not a letter, digit or
/// whitespace, then collapses whitespace runs to single spaces and trims.
/// Stripping happens before collapsing so that `"a - b"` becomes `"a b"`
/// and a second pass never changes the result.
///
/// An empty result means "no author".
pub fn normalize(raw: &str) -> String {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a comma-separated co-author field into normalized keys.
///
/// Empty pieces are dropped. Order is preserved and duplicates are kept;
/// the graph builder decides what a duplicate means.
pub fn split_coauthors(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(normalize)
        .filter(|name| !name.is_empty())
        .collect()
}
