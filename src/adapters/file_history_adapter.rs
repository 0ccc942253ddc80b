//! Line-oriented history file adapter.
//!
//! ```text
//! score, <canonical_id>, <total_value>, <total_weight>[, <last_update>]
//! alias, <mention_token>, <canonical_id>
//! ```
//!
//! Fields are not escaped, so ids and tokens must not contain commas. The
//! timestamp is everything after the fourth comma and may contain commas. Any
//! problem with the file resets the whole state to empty; valid lines before
//! a bad one are discarded too.

use crate::domain::accumulator::DEFAULT_MIN_WEIGHT;
use crate::domain::error::SentraderError;
use crate::domain::history::{HistoryState, ScoreRecord};
use crate::ports::history_port::HistoryPort;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Why a history file was rejected. Never leaves this adapter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryLoadError {
    #[error("history file not found")]
    Missing,

    #[error("history file is empty")]
    Empty,

    #[error("history file could not be read: {reason}")]
    Unreadable { reason: String },

    #[error("line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("line {line}: unrecognized record indicator '{indicator}'")]
    UnknownIndicator { line: u64, indicator: String },
}

pub struct FileHistoryAdapter {
    path: PathBuf,
    min_weight: f64,
}

impl FileHistoryAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            min_weight: DEFAULT_MIN_WEIGHT,
        }
    }

    /// Score records lighter than `min_weight` are dropped on load.
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    pub fn try_load(&self) -> Result<HistoryState, HistoryLoadError> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => HistoryLoadError::Missing,
            _ => HistoryLoadError::Unreadable {
                reason: e.to_string(),
            },
        })?;
        parse_history(&content, self.min_weight)
    }

    fn write_to(&self, path: &Path, state: &HistoryState) -> std::io::Result<()> {
        let mut out = BufWriter::new(fs::File::create(path)?);

        for record in state.sorted_scores() {
            write!(
                out,
                "score, {}, {}, {}",
                record.canonical_id, record.total_value, record.total_weight
            )?;
            if !record.last_update.is_empty() {
                write!(out, ", {}", record.last_update)?;
            }
            writeln!(out)?;
        }

        let mut aliases: Vec<(&String, &String)> = state.aliases.iter().collect();
        aliases.sort();
        for (token, canonical_id) in aliases {
            writeln!(out, "alias, {}, {}", token, canonical_id)?;
        }

        out.flush()?;
        out.get_ref().sync_all()
    }
}

fn malformed(line: u64, reason: impl Into<String>) -> HistoryLoadError {
    HistoryLoadError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn parse_number(line: u64, field: &str, raw: &str) -> Result<f64, HistoryLoadError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| malformed(line, format!("non-numeric {field} '{raw}'")))?;
    if !value.is_finite() {
        return Err(malformed(line, format!("non-finite {field} '{raw}'")));
    }
    Ok(value)
}

fn required<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    line: u64,
    field: &str,
) -> Result<&'r str, HistoryLoadError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(malformed(line, format!("missing {field}"))),
    }
}

/// Raw text after the `skip`-th comma of the record's source line.
fn trailing_text<'c>(content: &'c str, record: &csv::StringRecord, skip: usize) -> Option<&'c str> {
    let start = usize::try_from(record.position()?.byte()).ok()?;
    let line = content.get(start..)?.lines().next()?;
    line.splitn(skip + 1, ',').nth(skip).map(str::trim)
}

/// Parses a whole history file. Any bad line rejects the entire content.
pub fn parse_history(content: &str, min_weight: f64) -> Result<HistoryState, HistoryLoadError> {
    if content.is_empty() {
        return Err(HistoryLoadError::Empty);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut state = HistoryState::new();

    for result in rdr.records() {
        let record = result.map_err(|e| HistoryLoadError::Unreadable {
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        match record.get(0).unwrap_or_default() {
            "score" => {
                if record.len() < 4 {
                    return Err(malformed(
                        line,
                        format!("score record has {} fields, expected at least 4", record.len()),
                    ));
                }
                let canonical_id = required(&record, 1, line, "canonical id")?;
                let total_value = parse_number(line, "value", required(&record, 2, line, "value")?)?;
                let total_weight =
                    parse_number(line, "weight", required(&record, 3, line, "weight")?)?;
                if total_weight < 0.0 {
                    return Err(malformed(line, format!("negative weight {total_weight}")));
                }
                if total_weight < min_weight {
                    debug!(line, id = canonical_id, "dropping weightless score record");
                    continue;
                }
                let last_update = match record.len() {
                    4 => String::new(),
                    _ => trailing_text(content, &record, 4)
                        .map(str::to_string)
                        .unwrap_or_else(|| record.iter().skip(4).collect::<Vec<_>>().join(", ")),
                };
                state.scores.insert(
                    canonical_id.to_string(),
                    ScoreRecord {
                        canonical_id: canonical_id.to_string(),
                        total_value,
                        total_weight,
                        last_update,
                    },
                );
            }
            "alias" => {
                if record.len() != 3 {
                    return Err(malformed(
                        line,
                        format!("alias record has {} fields, expected 3", record.len()),
                    ));
                }
                let token = required(&record, 1, line, "mention token")?;
                let canonical_id = required(&record, 2, line, "canonical id")?;
                state.add_alias(token, canonical_id);
            }
            other => {
                return Err(HistoryLoadError::UnknownIndicator {
                    line,
                    indicator: other.to_string(),
                });
            }
        }
    }

    Ok(state)
}

impl HistoryPort for FileHistoryAdapter {
    fn load(&self) -> HistoryState {
        match self.try_load() {
            Ok(state) => {
                info!(
                    path = %self.path.display(),
                    scores = state.scores.len(),
                    aliases = state.aliases.len(),
                    "history loaded"
                );
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), "{e}, starting from a clean history");
                HistoryState::new()
            }
        }
    }

    fn save(&self, state: &HistoryState) -> Result<(), SentraderError> {
        let persist_err = |e: std::io::Error| SentraderError::Persist {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        let tmp = self.temp_path();
        if let Err(e) = self.write_to(&tmp, state) {
            let _ = fs::remove_file(&tmp);
            return Err(persist_err(e));
        }
        fs::rename(&tmp, &self.path).map_err(persist_err)?;

        info!(
            path = %self.path.display(),
            scores = state.scores.len(),
            aliases = state.aliases.len(),
            "history saved"
        );
        Ok(())
    }
}
