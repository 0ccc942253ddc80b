//! Batch source port.

use crate::domain::error::SentraderError;

pub trait BatchPort {
    /// Human-readable name of the source, used in errors and logs.
    fn source_name(&self) -> String;

    /// Raw batch lines with line terminators removed.
    fn read_lines(&self) -> Result<Vec<String>, SentraderError>;
}
