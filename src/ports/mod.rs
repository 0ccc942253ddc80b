//! Port traits: the seams between the scoring domain and the outside world.

pub mod analyzer_port;
pub mod batch_port;
pub mod config_port;
pub mod history_port;
pub mod trade_port;
