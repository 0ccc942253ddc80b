//! Weighted sentiment accumulation into per-company score records.

use crate::domain::history::{HistoryState, ScoreRecord};

/// Weights below this are treated as zero.
pub const DEFAULT_MIN_WEIGHT: f64 = 1e-6;

/// `ln(max(engagement, 1))`: zero for an engagement of 0 or 1, never negative.
pub fn engagement_weight(engagement: u64) -> f64 {
    (engagement.max(1) as f64).ln()
}

/// Folds (value, weight) observations into running weighted sums.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub min_weight: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            min_weight: DEFAULT_MIN_WEIGHT,
        }
    }
}

impl Accumulator {
    pub fn new(min_weight: f64) -> Self {
        Self { min_weight }
    }

    /// Adds one observation for `canonical_id`.
    ///
    /// An existing record gains `sentiment * weight` and `weight`, and its
    /// timestamp is overwritten by arrival order. A company with no record is
    /// seeded from the observation, unless the weight is below the floor: a
    /// zero-weight record must never exist, so the observation is dropped and
    /// `None` is returned.
    pub fn accumulate<'a>(
        &self,
        history: &'a mut HistoryState,
        canonical_id: &str,
        sentiment: f64,
        weight: f64,
        timestamp: &str,
    ) -> Option<&'a ScoreRecord> {
        let weight = weight.max(0.0);

        if weight < self.min_weight && !history.scores.contains_key(canonical_id) {
            return None;
        }

        let record = history
            .scores
            .entry(canonical_id.to_string())
            .or_insert_with(|| ScoreRecord {
                canonical_id: canonical_id.to_string(),
                total_value: 0.0,
                total_weight: 0.0,
                last_update: String::new(),
            });
        record.total_value += sentiment * weight;
        record.total_weight += weight;
        record.last_update = timestamp.to_string();
        Some(&*record)
    }
}
