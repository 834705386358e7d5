//! Data models module
//!
//! Latency sample collection, the median summary and the persisted
//! probe result.

pub mod latency;
pub mod result;

pub use latency::{duration_to_micros, format_median, median, LatencySamples};
pub use result::ProbeResult;
