//! Rayon integration for checksumming independent blocks in parallel.
//!
//! Every block gets its own accumulator context; the backend selection is
//! shared and read lock-free by the worker threads.

use rayon::prelude::*;

use crate::error::ChecksumError;
use crate::{ByteOrder, Checksum, fletcher_4};

/// Extension trait checksumming every item of a parallel iterator.
///
/// # Example
///
/// ```
/// use fletcher::ByteOrder;
/// use fletcher::parallel::ParallelFletcher4;
/// use rayon::prelude::*;
///
/// let blocks = vec![vec![0u8; 512], vec![1u8; 4096]];
/// let checksums = blocks.par_iter().fletcher4(ByteOrder::Native).unwrap();
/// assert_eq!(checksums.len(), 2);
/// ```
pub trait ParallelFletcher4 {
    /// Checksums every item, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ChecksumError::UnalignedLength`] encountered.
    fn fletcher4(self, order: ByteOrder) -> Result<Vec<Checksum>, ChecksumError>;
}

impl<I, T> ParallelFletcher4 for I
where
    I: IndexedParallelIterator<Item = T>,
    T: AsRef<[u8]> + Send,
{
    fn fletcher4(self, order: ByteOrder) -> Result<Vec<Checksum>, ChecksumError> {
        self.map(|block| fletcher_4(block.as_ref(), order)).collect()
    }
}

/// Checksums each block on the rayon pool.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when any block is not made of
/// whole 32-bit words.
pub fn checksum_blocks<B: AsRef<[u8]> + Sync>(
    blocks: &[B],
    order: ByteOrder,
) -> Result<Vec<Checksum>, ChecksumError> {
    blocks.par_iter().fletcher4(order)
}
