//! Batch driver: load history, score every message, emit directives, persist.
//!
//! A batch runs to completion or fails fatally. On any fatal error the history
//! store is left exactly as it was; it is only overwritten after trades have
//! been written successfully.

use crate::domain::accumulator::{engagement_weight, Accumulator, DEFAULT_MIN_WEIGHT};
use crate::domain::alias::AliasTable;
use crate::domain::error::SentraderError;
use crate::domain::extractor::extract;
use crate::domain::history::HistoryState;
use crate::domain::message::{parse_batch, MalformedLinePolicy, Message};
use crate::domain::signal::{emit_signals, Thresholds, TradeDirective};
use crate::ports::analyzer_port::TextAnalyzer;
use crate::ports::batch_port::BatchPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::trade_port::TradePort;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub thresholds: Thresholds,
    pub min_weight: f64,
    pub malformed_lines: MalformedLinePolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            min_weight: DEFAULT_MIN_WEIGHT,
            malformed_lines: MalformedLinePolicy::Abort,
        }
    }
}

/// Per-message tallies from folding a batch into the history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringSummary {
    /// Messages that mentioned no known company.
    pub unmatched_messages: usize,
    /// Messages the analyzer scored as NaN or infinite.
    pub unscored_messages: usize,
    /// Canonical ids whose records were created or updated.
    pub companies_updated: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub messages: usize,
    pub skipped_lines: usize,
    pub summary: ScoringSummary,
    pub directives: Vec<TradeDirective>,
}

/// Folds `messages` into `history`, in order.
pub fn score_messages(
    history: &mut HistoryState,
    messages: &[Message],
    analyzer: &dyn TextAnalyzer,
    accumulator: &Accumulator,
) -> ScoringSummary {
    let alias_table = AliasTable::from_aliases(&history.aliases);
    let mut summary = ScoringSummary::default();

    for message in messages {
        let companies = extract(&message.text, &alias_table);
        if companies.is_empty() {
            debug!(text = %message.text, "no company mentioned");
            summary.unmatched_messages += 1;
            continue;
        }

        let sentiment = analyzer.sentiment(&message.text);
        if !sentiment.is_finite() {
            warn!(text = %message.text, sentiment, "analyzer returned a non-finite score, skipping");
            summary.unscored_messages += 1;
            continue;
        }
        let sentiment = sentiment.clamp(-1.0, 1.0);
        let weight = engagement_weight(message.engagement);

        for canonical_id in companies {
            let applied = accumulator
                .accumulate(history, &canonical_id, sentiment, weight, &message.timestamp)
                .is_some();
            debug!(id = %canonical_id, sentiment, weight, applied, "observation");
            if applied {
                summary.companies_updated.insert(canonical_id);
            }
        }
    }

    summary
}

/// Runs one batch end to end.
///
/// Fatal errors (`EmptyBatch`, `UnreadableBatch`, `MalformedBatchLine` under
/// the abort policy, write failures) are returned before the history is saved.
pub fn run_batch(
    history_port: &dyn HistoryPort,
    batch_port: &dyn BatchPort,
    trade_port: &dyn TradePort,
    analyzer: &dyn TextAnalyzer,
    config: &ScoringConfig,
) -> Result<BatchReport, SentraderError> {
    info!("loading history");
    let mut history = history_port.load();

    info!(source = %batch_port.source_name(), "parsing batch");
    let lines = batch_port.read_lines()?;
    let parsed = parse_batch(&lines, config.malformed_lines, &batch_port.source_name())?;
    info!(
        messages = parsed.messages.len(),
        skipped = parsed.skipped_lines,
        "batch parsed"
    );

    let accumulator = Accumulator::new(config.min_weight);
    let summary = score_messages(&mut history, &parsed.messages, analyzer, &accumulator);
    info!(
        updated = summary.companies_updated.len(),
        unmatched = summary.unmatched_messages,
        unscored = summary.unscored_messages,
        "messages scored"
    );

    let directives = emit_signals(&history, &config.thresholds);
    trade_port.write(&directives)?;

    history_port.save(&history)?;
    info!(directives = directives.len(), "batch complete");

    Ok(BatchReport {
        messages: parsed.messages.len(),
        skipped_lines: parsed.skipped_lines,
        summary,
        directives,
    })
}
