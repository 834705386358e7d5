use crate::{IoLatError, Result};

/// Allocate a zero-filled buffer of exactly `len` bytes.
///
/// Allocation failure is reported instead of aborting the process.
pub fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buffer = preallocate::<u8>(len)?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Allocate an empty vector able to hold `count` elements without growing.
pub fn preallocate<T>(count: usize) -> Result<Vec<T>> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(count)
        .map_err(|_| IoLatError::Allocation {
            bytes: count.saturating_mul(std::mem::size_of::<T>()),
        })?;
    Ok(items)
}
