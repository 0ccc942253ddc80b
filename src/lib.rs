//! sentrader — social-media sentiment scoring and trade signal emission.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], process wiring in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
