//! History store port.

use crate::domain::error::SentraderError;
use crate::domain::history::HistoryState;

pub trait HistoryPort {
    /// Loads the persisted state. Never fails: a missing or corrupt store
    /// yields an empty state.
    fn load(&self) -> HistoryState;

    /// Replaces the persisted state wholesale.
    fn save(&self, state: &HistoryState) -> Result<(), SentraderError>;
}
