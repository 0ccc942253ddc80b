//! Domain error types.

/// Top-level error type for sentrader.
///
/// Only the fatal families reach the batch driver's caller. A missing or
/// corrupt history never shows up here: the history adapter resolves it by
/// resetting to an empty state.
#[derive(Debug, thiserror::Error)]
pub enum SentraderError {
    #[error("batch {source_name} is empty")]
    EmptyBatch { source_name: String },

    #[error("batch {source_name} could not be read: {reason}")]
    UnreadableBatch { source_name: String, reason: String },

    #[error("malformed batch line {line}: {reason}")]
    MalformedBatchLine { line: usize, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to write {path}: {reason}")]
    Persist { path: String, reason: String },
}

/// A score that fell outside every threshold band (NaN in practice).
///
/// Logged and skipped by the signal emitter; never aborts a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("score {score} for {canonical_id} could not be classified")]
pub struct UnclassifiableScore {
    pub canonical_id: String,
    pub score: f64,
}

impl From<&SentraderError> for std::process::ExitCode {
    fn from(err: &SentraderError) -> Self {
        let code: u8 = match err {
            SentraderError::EmptyBatch { .. } | SentraderError::UnreadableBatch { .. } => 1,
            SentraderError::ConfigParse { .. } | SentraderError::ConfigInvalid { .. } => 2,
            SentraderError::MalformedBatchLine { .. } => 3,
            SentraderError::Persist { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
