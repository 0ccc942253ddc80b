//! Finds the companies a message mentions.

use crate::domain::alias::AliasTable;
use crate::domain::normalize::normalize_tokens;
use std::collections::BTreeSet;

/// Canonical ids mentioned in `text`, deduplicated.
///
/// Every contiguous window of up to `alias_table.max_words()` normalized
/// tokens is looked up, so single-token aliases and multi-word names such as
/// `General Motors` both resolve. An empty set is a normal outcome.
pub fn extract(text: &str, alias_table: &AliasTable) -> BTreeSet<String> {
    let mut mentioned = BTreeSet::new();
    if alias_table.is_empty() {
        return mentioned;
    }

    let tokens = normalize_tokens(text);
    let max_window = alias_table.max_words().min(tokens.len());

    for width in 1..=max_window {
        for window in tokens.windows(width) {
            let candidate = window.join(" ");
            if let Some(canonical_id) = alias_table.resolve(&candidate) {
                mentioned.insert(canonical_id.to_string());
            }
        }
    }

    mentioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_table() -> AliasTable {
        let pairs = [
            ("General Motors", "NYSE: GM"),
            ("GM", "NYSE: GM"),
            ("TSLA", "NASDAQ: TSLA"),
            ("Tesla", "NASDAQ: TSLA"),
            ("UAL", "NYSE: UAL"),
            ("United", "NYSE: UAL"),
            ("United Airlines", "NYSE: UAL"),
            ("AMD", "NASDAQ: AMD"),
            ("AyyMD", "NASDAQ: AMD"),
            ("Advanced Micro Devices", "NASDAQ: AMD"),
        ];
        let aliases: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AliasTable::from_aliases(&aliases)
    }

    #[test]
    fn finds_single_company() {
        let found = extract("Tesla to the moon", &base_table());
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["NASDAQ: TSLA"]);
    }

    #[test]
    fn repeated_mentions_count_once() {
        let found = extract("Tesla Tesla $TSLA #Tesla", &base_table());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn finds_several_companies() {
        let found = extract("AMD beats while GM slumps", &base_table());
        let ids: Vec<&str> = found.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["NASDAQ: AMD", "NYSE: GM"]);
    }

    #[test]
    fn matches_multi_word_alias() {
        let found = extract("Advanced Micro Devices posts record quarter", &base_table());
        assert!(found.contains("NASDAQ: AMD"));

        let found = extract("delays at United Airlines again", &base_table());
        assert_eq!(found.len(), 1);
        assert!(found.contains("NYSE: UAL"));
    }

    #[test]
    fn possessive_matches_stripped_alias() {
        let found = extract("Tesla's earnings call", &base_table());
        assert!(found.contains("NASDAQ: TSLA"));
    }

    #[test]
    fn mention_handle_is_not_a_company() {
        let found = extract("@Tesla please fix my car", &base_table());
        assert!(found.is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        assert!(extract("nothing to see here", &base_table()).is_empty());
        assert!(extract("Tesla", &AliasTable::default()).is_empty());
    }
}
