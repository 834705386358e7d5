//! Offset space for block-aligned random probes

use rand::Rng;

use crate::{IoLatError, Result};

/// Range of block-aligned offsets a probe of `probe_size` bytes may start at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSpace {
    pub file_size: u64,
    pub probe_size: u64,
    pub block_size: u64,
    /// `file_size - probe_size`
    pub max_offset: u64,
    /// Number of drawable blocks, always at least one
    pub block_count: u64,
}

impl OffsetSpace {
    /// Derive the offset space, rejecting probes larger than the file.
    pub fn new(file_size: u64, probe_size: u64, block_size: u64) -> Result<Self> {
        if block_size == 0 {
            return Err(IoLatError::Validation(
                "Block size must be greater than 0".to_string(),
            ));
        }
        if probe_size == 0 {
            return Err(IoLatError::Validation(
                "Probe size must be greater than 0".to_string(),
            ));
        }
        if probe_size > file_size {
            return Err(IoLatError::Validation(format!(
                "File size too small for probe size ({} < {} bytes)",
                file_size, probe_size
            )));
        }

        let max_offset = file_size - probe_size;
        // Ceiling division. The last block may start past max_offset when
        // max_offset is not block aligned; drawn offsets are not clamped.
        let block_count = max_offset.div_ceil(block_size).max(1);

        Ok(Self {
            file_size,
            probe_size,
            block_size,
            max_offset,
            block_count,
        })
    }

    /// Byte offset of `block`
    pub fn offset_of(&self, block: u64) -> u64 {
        block * self.block_size
    }

    /// Draw a uniformly random block and return its byte offset.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.offset_of(rng.gen_range(0..self.block_count))
    }

    /// Largest offset `sample` can return
    pub fn last_offset(&self) -> u64 {
        self.offset_of(self.block_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_SIZE;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_offset_when_probe_equals_file() {
        let space = OffsetSpace::new(4096, 4096, BLOCK_SIZE).unwrap();
        assert_eq!(space.max_offset, 0);
        assert_eq!(space.block_count, 1);

        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..32 {
            assert_eq!(space.sample(&mut rng), 0);
        }
    }

    #[test]
    fn test_block_count_rounds_up_partial_block() {
        // max_offset = 8192 exactly: two blocks
        let aligned = OffsetSpace::new(8192 + 512, 512, BLOCK_SIZE).unwrap();
        assert_eq!(aligned.max_offset, 8192);
        assert_eq!(aligned.block_count, 2);

        // max_offset = 8193: a third, partial block
        let partial = OffsetSpace::new(8193 + 512, 512, BLOCK_SIZE).unwrap();
        assert_eq!(partial.block_count, 3);
        assert_eq!(partial.last_offset(), 8192);

        // max_offset smaller than one block still yields one block
        let small = OffsetSpace::new(100, 1, BLOCK_SIZE).unwrap();
        assert_eq!(small.block_count, 1);
    }

    #[test]
    fn test_sampled_offsets_are_aligned_and_bounded() {
        let space = OffsetSpace::new(1024 * 1024 + 123, 4096, BLOCK_SIZE).unwrap();
        let mut rng = SmallRng::seed_from_u64(0xfeed);
        for _ in 0..10_000 {
            let offset = space.sample(&mut rng);
            assert_eq!(offset % BLOCK_SIZE, 0);
            assert!(offset <= space.block_count * BLOCK_SIZE);
            assert!(offset <= space.last_offset());
        }
    }

    #[test]
    fn test_sampling_reaches_every_block() {
        let space = OffsetSpace::new(8 * 4096, 4096, BLOCK_SIZE).unwrap();
        assert_eq!(space.block_count, 7);
        let mut seen = [false; 7];
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..2_000 {
            seen[(space.sample(&mut rng) / BLOCK_SIZE) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let space = OffsetSpace::new(64 * 4096, 4096, BLOCK_SIZE).unwrap();
        let mut a = SmallRng::seed_from_u64(1_700_000_000);
        let mut b = SmallRng::seed_from_u64(1_700_000_000);
        let first: Vec<u64> = (0..50).map(|_| space.sample(&mut a)).collect();
        let second: Vec<u64> = (0..50).map(|_| space.sample(&mut b)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_probe_larger_than_file() {
        let err = OffsetSpace::new(4095, 4096, BLOCK_SIZE).unwrap_err();
        assert_eq!(err.category(), "validation");
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_rejects_zero_probe() {
        assert!(OffsetSpace::new(4096, 0, BLOCK_SIZE).is_err());
    }
}
