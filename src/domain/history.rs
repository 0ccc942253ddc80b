//! Persisted scoring state: per-company score records plus the alias mapping.

use std::collections::HashMap;

/// Running weighted sentiment for one company.
///
/// Stores the raw sums so later observations can be folded in incrementally;
/// the reported score is `total_value / total_weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub canonical_id: String,
    pub total_value: f64,
    pub total_weight: f64,
    pub last_update: String,
}

impl ScoreRecord {
    /// Weighted mean sentiment, or `None` while the record carries no weight.
    pub fn mean(&self) -> Option<f64> {
        if self.total_weight > 0.0 {
            Some(self.total_value / self.total_weight)
        } else {
            None
        }
    }
}

/// Full state owned by one batch run: loaded once, mutated, saved once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryState {
    pub scores: HashMap<String, ScoreRecord>,
    pub aliases: HashMap<String, String>,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty() && self.aliases.is_empty()
    }

    /// Registers a mention token; returns the canonical id it previously mapped to.
    pub fn add_alias(&mut self, token: &str, canonical_id: &str) -> Option<String> {
        self.aliases
            .insert(token.to_string(), canonical_id.to_string())
    }

    pub fn score(&self, canonical_id: &str) -> Option<&ScoreRecord> {
        self.scores.get(canonical_id)
    }

    /// Score records sorted by canonical id, for stable display.
    pub fn sorted_scores(&self) -> Vec<&ScoreRecord> {
        let mut records: Vec<&ScoreRecord> = self.scores.values().collect();
        records.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));
        records
    }
}
