//! Sentiment scoring port.

/// Opaque per-message polarity scorer.
///
/// Implementations should return a value in [-1, 1]. The batch driver clamps
/// finite values into that range and skips messages scored as NaN or infinite.
pub trait TextAnalyzer {
    fn sentiment(&self, text: &str) -> f64;
}
