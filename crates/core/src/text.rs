//! Small string heuristics shared by the format parsers.

/// Case-insensitive substring search for any of `keywords`.
///
/// Keywords are expected in lowercase; the text is lowercased with full
/// Unicode rules so accented keywords (`percepción`) match.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

/// First space-delimited token, or `None` for an empty string.
pub fn first_token(text: &str) -> Option<&str> {
    text.split(' ').next().filter(|t| !t.is_empty())
}
