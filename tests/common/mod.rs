#![allow(dead_code)]

use sentrader::domain::error::SentraderError;
use sentrader::domain::history::{HistoryState, ScoreRecord};
use sentrader::domain::signal::TradeDirective;
use sentrader::ports::analyzer_port::TextAnalyzer;
use sentrader::ports::batch_port::BatchPort;
use sentrader::ports::history_port::HistoryPort;
use sentrader::ports::trade_port::TradePort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub const BASE_ALIASES: &[(&str, &str)] = &[
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

pub fn base_history() -> HistoryState {
    let mut state = HistoryState::new();
    for (token, id) in BASE_ALIASES {
        state.add_alias(token, id);
    }
    state
}

pub fn base_history_file() -> String {
    BASE_ALIASES
        .iter()
        .map(|(token, id)| format!("alias, {token}, {id}\n"))
        .collect()
}

pub fn record(id: &str, value: f64, weight: f64, ts: &str) -> ScoreRecord {
    ScoreRecord {
        canonical_id: id.to_string(),
        total_value: value,
        total_weight: weight,
        last_update: ts.to_string(),
    }
}

/// In-memory history store that remembers every save.
pub struct MockHistoryPort {
    pub initial: HistoryState,
    pub saved: RefCell<Vec<HistoryState>>,
    pub fail_save: bool,
}

impl MockHistoryPort {
    pub fn new(initial: HistoryState) -> Self {
        Self {
            initial,
            saved: RefCell::new(Vec::new()),
            fail_save: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn last_saved(&self) -> Option<HistoryState> {
        self.saved.borrow().last().cloned()
    }
}

impl HistoryPort for MockHistoryPort {
    fn load(&self) -> HistoryState {
        self.initial.clone()
    }

    fn save(&self, state: &HistoryState) -> Result<(), SentraderError> {
        if self.fail_save {
            return Err(SentraderError::Persist {
                path: "mock".into(),
                reason: "disk full".into(),
            });
        }
        self.saved.borrow_mut().push(state.clone());
        Ok(())
    }
}

pub struct MockBatchPort {
    pub lines: Option<Vec<String>>,
}

impl MockBatchPort {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: Some(lines.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn unreadable() -> Self {
        Self { lines: None }
    }
}

impl BatchPort for MockBatchPort {
    fn source_name(&self) -> String {
        "mock-batch".to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>, SentraderError> {
        self.lines
            .clone()
            .ok_or_else(|| SentraderError::UnreadableBatch {
                source_name: self.source_name(),
                reason: "not found".into(),
            })
    }
}

#[derive(Default)]
pub struct MockTradePort {
    pub written: RefCell<Option<Vec<TradeDirective>>>,
    pub fail: bool,
}

impl TradePort for MockTradePort {
    fn write(&self, directives: &[TradeDirective]) -> Result<(), SentraderError> {
        if self.fail {
            return Err(SentraderError::Persist {
                path: "mock-trades".into(),
                reason: "read-only".into(),
            });
        }
        *self.written.borrow_mut() = Some(directives.to_vec());
        Ok(())
    }
}

/// Returns a fixed score for any text, or a per-keyword score when one matches.
pub struct StubAnalyzer {
    pub default: f64,
    pub by_keyword: HashMap<String, f64>,
    pub calls: Cell<usize>,
}

impl StubAnalyzer {
    pub fn fixed(score: f64) -> Self {
        Self {
            default: score,
            by_keyword: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_keyword(mut self, keyword: &str, score: f64) -> Self {
        self.by_keyword.insert(keyword.to_string(), score);
        self
    }
}

impl TextAnalyzer for StubAnalyzer {
    fn sentiment(&self, text: &str) -> f64 {
        self.calls.set(self.calls.get() + 1);
        self.by_keyword
            .iter()
            .find(|(keyword, _)| text.contains(keyword.as_str()))
            .map(|(_, score)| *score)
            .unwrap_or(self.default)
    }
}
