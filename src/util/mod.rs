//! Utility functions module
//!
//! Human-readable formatting of sizes, latencies and throughput for
//! log output.

pub mod units;

pub use units::{calculate_throughput_mbps, format_bytes, format_latency_us, format_throughput};
