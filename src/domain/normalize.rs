//! Message text normalization shared by the extractor and the alias table.
//!
//! Policy, applied per whitespace-separated word:
//! - URLs (`http://`, `https://`, `www.`) and `@mentions` are dropped whole.
//! - A trailing possessive `'s` is removed, so `Tesla's` becomes `Tesla`.
//! - Every remaining non-alphanumeric character is removed
//!   (`#Tesla` -> `Tesla`, `$TSLA` -> `TSLA`, `AT&T` -> `ATT`).
//! - Words left empty are discarded, which also collapses repeated whitespace.

const URL_PREFIXES: [&str; 3] = ["http://", "https://", "www."];
const POSSESSIVES: [&str; 2] = ["'s", "\u{2019}s"];

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

fn is_url(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    URL_PREFIXES.iter().any(|p| lower.starts_with(p))
}

fn normalize_word(word: &str) -> Option<String> {
    if word.starts_with('@') || is_url(word) {
        return None;
    }

    let trimmed = word.trim_end_matches(|c: char| !c.is_alphanumeric() && !is_apostrophe(c));
    let stem = POSSESSIVES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .unwrap_or(trimmed);

    let cleaned: String = stem.chars().filter(|c| c.is_alphanumeric()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Splits `text` into normalized tokens, in order.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().filter_map(normalize_word).collect()
}
