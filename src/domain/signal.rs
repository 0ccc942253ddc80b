//! Threshold classification of weighted-mean scores into trade directives.

use crate::domain::error::UnclassifiableScore;
use crate::domain::history::HistoryState;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Call,
    Put,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Call => write!(f, "call"),
            Direction::Put => write!(f, "put"),
        }
    }
}

/// Soft directives sit just past a threshold, hard ones far beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intensity {
    Soft,
    Hard,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Soft => write!(f, "soft"),
            Intensity::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeDirective {
    pub canonical_id: String,
    pub direction: Direction,
    pub intensity: Intensity,
    pub timestamp: String,
}

/// Band edges on the [-1, 1] weighted-mean scale.
///
/// Valid tables satisfy `put_hard <= put_soft < call_soft <= call_hard`
/// (see `config_validation::validate_thresholds`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub put_hard: f64,
    pub put_soft: f64,
    pub call_soft: f64,
    pub call_hard: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            put_hard: -0.5,
            put_soft: -0.2,
            call_soft: 0.2,
            call_hard: 0.5,
        }
    }
}

impl Thresholds {
    /// Maps a score to its band. Soft bands include both of their edges.
    ///
    /// `Ok(None)` is the neutral zone. `Err` only for scores no band accepts,
    /// which for a valid table means NaN.
    pub fn classify(
        &self,
        canonical_id: &str,
        score: f64,
    ) -> Result<Option<(Direction, Intensity)>, UnclassifiableScore> {
        if score < self.put_hard {
            Ok(Some((Direction::Put, Intensity::Hard)))
        } else if self.put_hard <= score && score <= self.put_soft {
            Ok(Some((Direction::Put, Intensity::Soft)))
        } else if self.put_soft < score && score < self.call_soft {
            Ok(None)
        } else if self.call_soft <= score && score <= self.call_hard {
            Ok(Some((Direction::Call, Intensity::Soft)))
        } else if score > self.call_hard {
            Ok(Some((Direction::Call, Intensity::Hard)))
        } else {
            Err(UnclassifiableScore {
                canonical_id: canonical_id.to_string(),
                score,
            })
        }
    }
}

/// One directive per company whose weighted mean falls in a trading band.
///
/// Companies in the neutral zone, without weight, or with an unclassifiable
/// score are left out; the last case is logged. Output is sorted by id.
pub fn emit_signals(history: &HistoryState, thresholds: &Thresholds) -> Vec<TradeDirective> {
    let mut directives = Vec::new();

    for record in history.sorted_scores() {
        let Some(score) = record.mean() else {
            continue;
        };

        match thresholds.classify(&record.canonical_id, score) {
            Ok(Some((direction, intensity))) => {
                debug!(id = %record.canonical_id, score, %direction, %intensity, "directive");
                directives.push(TradeDirective {
                    canonical_id: record.canonical_id.clone(),
                    direction,
                    intensity,
                    timestamp: record.last_update.clone(),
                });
            }
            Ok(None) => {
                debug!(id = %record.canonical_id, score, "neutral, no directive");
            }
            Err(e) => warn!("{e}, skipping"),
        }
    }

    directives
}
