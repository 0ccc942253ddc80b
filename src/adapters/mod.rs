//! Concrete adapter implementations for ports.

pub mod file_batch_adapter;
pub mod file_config_adapter;
pub mod file_history_adapter;
pub mod file_trade_adapter;
pub mod lexicon_analyzer;
