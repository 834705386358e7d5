//! Units formatting and conversion utilities

use std::time::Duration;

/// Format bytes into human-readable size with binary units
///
/// # Examples
/// ```
/// use iolat::util::units::format_bytes;
///
/// assert_eq!(format_bytes(4096), "4.0 KiB");
/// assert_eq!(format_bytes(1048576), "1.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a latency given in microseconds
///
/// # Examples
/// ```
/// use iolat::util::units::format_latency_us;
///
/// assert_eq!(format_latency_us(5681.04), "5.68ms");
/// assert_eq!(format_latency_us(87.5), "87.50μs");
/// ```
pub fn format_latency_us(micros: f64) -> String {
    if micros >= 1_000_000.0 {
        format!("{:.2}s", micros / 1_000_000.0)
    } else if micros >= 1000.0 {
        format!("{:.2}ms", micros / 1000.0)
    } else {
        format!("{:.2}μs", micros)
    }
}

/// Throughput in MiB/s
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }
    bytes as f64 / 1_048_576.0 / duration.as_secs_f64()
}

/// Format a MiB/s value with appropriate units
pub fn format_throughput(mbps: f64) -> String {
    if mbps >= 1024.0 {
        format!("{:.1} GiB/s", mbps / 1024.0)
    } else if mbps >= 1.0 {
        format!("{:.1} MiB/s", mbps)
    } else {
        format!("{:.1} KiB/s", mbps * 1024.0)
    }
}
