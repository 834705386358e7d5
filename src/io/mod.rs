//! I/O operations module
//!
//! Contains the file handle abstractions used by the writer and the
//! prober, and fallible buffer allocation.

pub mod buffer;
pub mod disk;

pub use buffer::{preallocate, zeroed};
pub use disk::{create_disk_io, BlockFile, DiskIO, PlatformDiskIO, StdBlockFile};
