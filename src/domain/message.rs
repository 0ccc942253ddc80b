//! Batch input lines: `<text>|<engagement>|<timestamp>`.

use crate::domain::error::SentraderError;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub engagement: u64,
    pub timestamp: String,
}

/// What to do with a batch line that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// The whole batch fails; nothing is persisted. Blank lines are not
    /// malformed and never abort a batch.
    #[default]
    Abort,
    /// The line is counted and skipped.
    Skip,
}

impl FromStr for MalformedLinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(MalformedLinePolicy::Abort),
            "skip" => Ok(MalformedLinePolicy::Skip),
            other => Err(format!("expected 'abort' or 'skip', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub messages: Vec<Message>,
    pub skipped_lines: usize,
}

/// Parses one line. Fields are split from the right so the text may contain `|`.
///
/// `line_no` is 1-based and only used for error reporting. An empty timestamp
/// field is stamped with the current UTC time.
pub fn parse_line(line: &str, line_no: usize) -> Result<Message, SentraderError> {
    let malformed = |reason: String| SentraderError::MalformedBatchLine {
        line: line_no,
        reason,
    };

    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.rsplitn(3, '|');
    let timestamp = fields.next();
    let engagement = fields.next();
    let text = fields.next();

    let (Some(text), Some(engagement), Some(timestamp)) = (text, engagement, timestamp) else {
        return Err(malformed(
            "expected <text>|<engagement>|<timestamp>".to_string(),
        ));
    };

    let engagement: u64 = engagement
        .trim()
        .parse()
        .map_err(|e| malformed(format!("invalid engagement '{}': {}", engagement.trim(), e)))?;

    let timestamp = match timestamp.trim() {
        "" => chrono::Utc::now().to_rfc3339(),
        ts => ts.to_string(),
    };

    Ok(Message {
        text: text.to_string(),
        engagement,
        timestamp,
    })
}

/// Parses every non-blank line, applying `policy` to lines that fail.
///
/// Returns `EmptyBatch` when no message survives.
pub fn parse_batch(
    lines: &[String],
    policy: MalformedLinePolicy,
    source_name: &str,
) -> Result<ParsedBatch, SentraderError> {
    let mut batch = ParsedBatch::default();

    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, idx + 1) {
            Ok(message) => batch.messages.push(message),
            Err(e) => match policy {
                MalformedLinePolicy::Abort => return Err(e),
                MalformedLinePolicy::Skip => {
                    warn!("{e}, skipping");
                    batch.skipped_lines += 1;
                }
            },
        }
    }

    if batch.messages.is_empty() {
        return Err(SentraderError::EmptyBatch {
            source_name: source_name.to_string(),
        });
    }

    Ok(batch)
}
