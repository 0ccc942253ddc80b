//! Word-polarity sentiment analyzer.
//!
//! Each lowercase word maps to a polarity in [-1, 1]; a message scores the
//! mean polarity of the words it matches, 0.0 when it matches none. A
//! negator (`not`, `never`, ...) flips the polarity of the word after it.

use crate::domain::error::SentraderError;
use crate::domain::normalize::normalize_tokens;
use crate::ports::analyzer_port::TextAnalyzer;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("bull", 0.8),
    ("bullish", 0.9),
    ("moon", 0.9),
    ("rocket", 0.8),
    ("rally", 0.7),
    ("surge", 0.7),
    ("soar", 0.8),
    ("soaring", 0.8),
    ("beat", 0.6),
    ("beats", 0.6),
    ("record", 0.5),
    ("profit", 0.5),
    ("growth", 0.5),
    ("strong", 0.5),
    ("buy", 0.6),
    ("long", 0.4),
    ("upgrade", 0.6),
    ("love", 0.6),
    ("great", 0.5),
    ("win", 0.5),
    ("up", 0.3),
    ("bear", -0.8),
    ("bearish", -0.9),
    ("crash", -0.9),
    ("plunge", -0.8),
    ("dump", -0.7),
    ("slump", -0.7),
    ("slumps", -0.7),
    ("miss", -0.6),
    ("misses", -0.6),
    ("loss", -0.5),
    ("losses", -0.5),
    ("weak", -0.5),
    ("sell", -0.6),
    ("short", -0.4),
    ("downgrade", -0.6),
    ("recall", -0.6),
    ("lawsuit", -0.6),
    ("delay", -0.4),
    ("delays", -0.4),
    ("bankrupt", -1.0),
    ("fraud", -1.0),
    ("hate", -0.6),
    ("terrible", -0.7),
    ("down", -0.3),
];

const NEGATORS: &[&str] = &["not", "no", "never", "dont", "cant", "wont", "isnt", "didnt"];

pub struct LexiconAnalyzer {
    polarity: HashMap<String, f64>,
    negators: HashSet<&'static str>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_LEXICON
                .iter()
                .map(|(word, score)| (word.to_string(), *score)),
        )
    }
}

impl LexiconAnalyzer {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            polarity: entries
                .into_iter()
                .map(|(word, score)| (word.to_lowercase(), score.clamp(-1.0, 1.0)))
                .collect(),
            negators: NEGATORS.iter().copied().collect(),
        }
    }

    /// Loads `word, polarity` lines. Blank lines are ignored; anything else
    /// that does not parse is an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SentraderError> {
        let path = path.as_ref();
        let invalid = |reason: String| SentraderError::ConfigInvalid {
            section: "analyzer".into(),
            key: "lexicon".into(),
            reason: format!("{}: {}", path.display(), reason),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| invalid(e.to_string()))?;

        let mut entries = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| invalid(e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let (Some(word), Some(score)) = (record.get(0), record.get(1)) else {
                return Err(invalid(format!("line {line}: expected <word>, <polarity>")));
            };
            let score: f64 = score
                .parse()
                .map_err(|_| invalid(format!("line {line}: invalid polarity '{score}'")))?;
            if word.is_empty() || !score.is_finite() {
                return Err(invalid(format!("line {line}: invalid entry")));
            }
            entries.push((word.to_string(), score));
        }

        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.polarity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarity.is_empty()
    }
}

impl TextAnalyzer for LexiconAnalyzer {
    fn sentiment(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut matched = 0usize;
        let mut negate = false;

        for token in normalize_tokens(text) {
            let word = token.to_lowercase();
            if self.negators.contains(word.as_str()) {
                negate = true;
                continue;
            }
            if let Some(score) = self.polarity.get(&word) {
                total += if negate { -score } else { *score };
                matched += 1;
            }
            negate = false;
        }

        if matched == 0 {
            0.0
        } else {
            (total / matched as f64).clamp(-1.0, 1.0)
        }
    }
}
