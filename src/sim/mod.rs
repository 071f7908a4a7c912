//! Simulation utilities.
//!
//! - `playout`: drive games to completion with random adjudication

mod playout;

pub use playout::{Playout, PlayoutConfig, PlayoutSummary};
