//! Block Decomposer.
//!
//! Splits a variable-sized request into unit-size block accesses so policies only
//! ever see unit items. A request of `size` bytes on integer key `k` becomes
//! `ceil(size / block_unit_size)` blocks with keys `k, k+1, ..., k+n-1`. A zero
//! size counts as one block. Text keys cannot be offset and pass through as a
//! single block.

use crate::common::{ConfigError, Request, SimKey};

/// Fixed-size block splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDecomposer {
    block_unit_size: u64,
}

impl BlockDecomposer {
    /// Creates a decomposer for blocks of `block_unit_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBlockUnit`] for a zero block size.
    pub fn new(block_unit_size: u64) -> Result<Self, ConfigError> {
        if block_unit_size == 0 {
            return Err(ConfigError::ZeroBlockUnit);
        }
        Ok(Self { block_unit_size })
    }

    /// Size of one block in bytes.
    pub const fn block_unit_size(&self) -> u64 {
        self.block_unit_size
    }

    /// Number of blocks a request of `size` bytes spans.
    #[inline]
    pub const fn block_count(&self, size: u64) -> u64 {
        if size == 0 {
            1
        } else {
            size.div_ceil(self.block_unit_size)
        }
    }

    /// Block keys for one request, first block first.
    pub fn split<'a, K: SimKey>(&self, request: &'a Request<K>) -> Blocks<'a, K> {
        let count = if request.key.offset(0).is_some() {
            self.block_count(request.size)
        } else {
            1
        };
        Blocks {
            base: &request.key,
            next: 0,
            count,
        }
    }
}

/// Iterator over the block keys of one request.
#[derive(Debug)]
pub struct Blocks<'a, K> {
    base: &'a K,
    next: u64,
    count: u64,
}

impl<K: SimKey> Iterator for Blocks<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.next >= self.count {
            return None;
        }
        let key = if self.next == 0 {
            self.base.clone()
        } else {
            self.base.offset(self.next)?
        };
        self.next += 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.next);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<K: SimKey> ExactSizeIterator for Blocks<'_, K> {}
