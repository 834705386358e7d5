//! Benchmark engine module
//!
//! Contains the offset space, the random read latency prober and the
//! sequential zero-fill writer.

pub mod offset;
pub mod probe;
pub mod writer;

// Re-export commonly used types
pub use offset::OffsetSpace;
pub use probe::{LatencyProber, ProbeReport};
pub use writer::{WriteReport, Writer};
