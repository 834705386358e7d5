use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::{IoLatError, Result};

/// Filesystem entry points used by a run
pub trait DiskIO {
    /// Create `path`, truncating any existing file, for sequential writes
    fn create_truncate(&self, path: &Path) -> Result<Box<dyn BlockFile>>;

    /// Open an existing file read-only
    fn open_read(&self, path: &Path) -> Result<Box<dyn BlockFile>>;

    /// Current size of the file at `path` in bytes (stat)
    fn file_size(&self, path: &Path) -> Result<u64>;
}

/// Single-call file operations.
///
/// Each method maps to exactly one system call. Short reads and writes are
/// returned to the caller as-is and never completed with a second call.
pub trait BlockFile {
    /// One `write` call
    fn write_block(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// One `read` call
    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reposition the cursor to an absolute offset
    fn seek_block(&mut self, offset: u64) -> io::Result<u64>;

    /// Durability barrier (fsync)
    fn sync_all(&mut self) -> io::Result<()>;
}

/// `BlockFile` backed by a regular `std::fs::File`
pub struct StdBlockFile {
    file: File,
}

impl StdBlockFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl BlockFile for StdBlockFile {
    fn write_block(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn seek_block(&mut self, offset: u64) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(offset))
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// Platform-specific disk I/O implementation
#[derive(Clone, Debug)]
pub struct PlatformDiskIO;

impl PlatformDiskIO {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlatformDiskIO {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use std::os::unix::fs::OpenOptionsExt;

    /// rw-rw-r--, before umask
    pub const CREATE_MODE: u32 =
        (libc::S_IRUSR | libc::S_IWUSR | libc::S_IRGRP | libc::S_IWGRP | libc::S_IROTH) as u32;

    pub(super) fn create_options() -> OpenOptions {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true).mode(CREATE_MODE);
        options
    }
}

#[cfg(not(unix))]
mod portable_impl {
    use super::*;

    pub(super) fn create_options() -> OpenOptions {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        options
    }
}

#[cfg(unix)]
pub use unix_impl::CREATE_MODE;

#[cfg(unix)]
use unix_impl::create_options;

#[cfg(not(unix))]
use portable_impl::create_options;

impl DiskIO for PlatformDiskIO {
    fn create_truncate(&self, path: &Path) -> Result<Box<dyn BlockFile>> {
        let file = create_options()
            .open(path)
            .map_err(|e| IoLatError::io("open", path, e))?;
        Ok(Box::new(StdBlockFile::new(file)))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn BlockFile>> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| IoLatError::io("open", path, e))?;
        Ok(Box::new(StdBlockFile::new(file)))
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let metadata = std::fs::metadata(path).map_err(|e| IoLatError::io("stat", path, e))?;
        Ok(metadata.len())
    }
}

/// Create a new platform-specific disk I/O instance
pub fn create_disk_io() -> impl DiskIO {
    PlatformDiskIO::new()
}
