//! Mention-token to canonical-id lookup, built once per batch and read-only after.

use crate::domain::normalize::normalize_tokens;
use std::collections::HashMap;
use tracing::warn;

/// Many-to-one mapping from normalized mention tokens to canonical ids.
///
/// Keys are run through the same normalization as message text, so an alias
/// registered as `"Tesla's"` and a message token `"Tesla"` meet on `"Tesla"`.
/// Multi-word aliases are stored with their words joined by a single space.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    index: HashMap<String, String>,
    max_words: usize,
}

impl AliasTable {
    pub fn from_aliases(aliases: &HashMap<String, String>) -> Self {
        let mut tokens: Vec<(&String, &String)> = aliases.iter().collect();
        tokens.sort();

        let mut index: HashMap<String, String> = HashMap::with_capacity(tokens.len());
        let mut max_words = 0;

        for (token, canonical_id) in tokens {
            let words = normalize_tokens(token);
            if words.is_empty() {
                warn!(alias = %token, "alias normalizes to nothing, ignoring");
                continue;
            }
            max_words = max_words.max(words.len());
            let key = words.join(" ");
            if let Some(previous) = index.insert(key.clone(), canonical_id.clone()) {
                if previous != *canonical_id {
                    warn!(
                        alias = %key,
                        kept = %canonical_id,
                        dropped = %previous,
                        "aliases collide after normalization"
                    );
                }
            }
        }

        Self { index, max_words }
    }

    /// Looks up an already-normalized token (or space-joined token window).
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.index.get(token).map(String::as_str)
    }

    /// Word count of the longest alias; bounds the extractor's window size.
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn many_tokens_map_to_one_id() {
        let table = AliasTable::from_aliases(&aliases(&[
            ("Tesla", "NASDAQ: TSLA"),
            ("TSLA", "NASDAQ: TSLA"),
        ]));
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("Tesla"), Some("NASDAQ: TSLA"));
        assert_eq!(table.resolve("TSLA"), Some("NASDAQ: TSLA"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = AliasTable::from_aliases(&aliases(&[("Tesla", "NASDAQ: TSLA")]));
        assert_eq!(table.resolve("tesla"), None);
    }

    #[test]
    fn keys_are_normalized() {
        let table = AliasTable::from_aliases(&aliases(&[
            ("Tesla's", "NASDAQ: TSLA"),
            ("AT&T", "NYSE: T"),
        ]));
        assert_eq!(table.resolve("Tesla"), Some("NASDAQ: TSLA"));
        assert_eq!(table.resolve("ATT"), Some("NYSE: T"));
    }

    #[test]
    fn tracks_longest_alias() {
        let table = AliasTable::from_aliases(&aliases(&[
            ("GM", "NYSE: GM"),
            ("Advanced Micro Devices", "NASDAQ: AMD"),
            ("General  Motors", "NYSE: GM"),
        ]));
        assert_eq!(table.max_words(), 3);
        assert_eq!(table.resolve("General Motors"), Some("NYSE: GM"));
    }

    #[test]
    fn punctuation_only_alias_is_ignored() {
        let table = AliasTable::from_aliases(&aliases(&[("!!", "NYSE: X")]));
        assert!(table.is_empty());
        assert_eq!(table.max_words(), 0);
    }
}
