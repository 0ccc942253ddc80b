//! Trade directive output port.

use crate::domain::error::SentraderError;
use crate::domain::signal::TradeDirective;

pub trait TradePort {
    /// Overwrites the previous batch's directives with `directives`.
    fn write(&self, directives: &[TradeDirective]) -> Result<(), SentraderError>;
}
