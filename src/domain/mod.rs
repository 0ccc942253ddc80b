//! Core scoring domain: history state, alias resolution, accumulation,
//! threshold signals and the batch driver that composes them.

pub mod accumulator;
pub mod alias;
pub mod batch;
pub mod config_validation;
pub mod error;
pub mod extractor;
pub mod history;
pub mod message;
pub mod normalize;
pub mod signal;
