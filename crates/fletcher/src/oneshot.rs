//! One-shot and incremental checksums over word-aligned buffers.

use crate::error::ChecksumError;
use crate::select::backend_for_operation;
use crate::{Backend, ByteOrder, Checksum, FLETCHER_4_INC_MAX_SIZE};

/// Inputs are split at this granularity: the aligned prefix goes through the
/// selected backend, the shorter tail is folded serially.
pub const FLETCHER_MIN_SIMD_SIZE: usize = 64;

/// Incremental updates smaller than this are folded serially instead of
/// being checksummed separately and combined.
pub const SPA_MINBLOCKSIZE: usize = 512;

const INC_STEP: usize = FLETCHER_4_INC_MAX_SIZE as usize;

fn check_aligned(buf: &[u8]) -> Result<(), ChecksumError> {
    if buf.len().is_multiple_of(4) {
        Ok(())
    } else {
        Err(ChecksumError::UnalignedLength { len: buf.len() })
    }
}

/// Checksums `buf` with an explicit backend.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
pub fn fletcher_4_with(
    backend: Backend,
    buf: &[u8],
    order: ByteOrder,
) -> Result<Checksum, ChecksumError> {
    check_aligned(buf)?;

    let split = buf.len() - buf.len() % FLETCHER_MIN_SIMD_SIZE;
    let (blocks, tail) = buf.split_at(split);

    let mut checksum = if blocks.is_empty() {
        Checksum::ZERO
    } else {
        let mut ctx = backend.init();
        ctx.compute(blocks, order);
        ctx.finalize()
    };
    checksum.fold(tail, order);
    Ok(checksum)
}

/// Checksums `buf` in the given byte order with the selected backend.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
pub fn fletcher_4(buf: &[u8], order: ByteOrder) -> Result<Checksum, ChecksumError> {
    fletcher_4_with(backend_for_operation(), buf, order)
}

/// Checksums `buf` read as host-order words.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
///
/// # Examples
///
/// ```
/// use fletcher::fletcher_4_native;
///
/// let data: Vec<u8> = [1u32, 2, 3, 4].iter().flat_map(|w| w.to_ne_bytes()).collect();
/// assert_eq!(fletcher_4_native(&data).unwrap().words(), [10, 20, 35, 56]);
/// assert!(fletcher_4_native(&[0u8; 3]).is_err());
/// ```
pub fn fletcher_4_native(buf: &[u8]) -> Result<Checksum, ChecksumError> {
    fletcher_4(buf, ByteOrder::Native)
}

/// Checksums `buf` with every word byte-reversed.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
pub fn fletcher_4_byteswap(buf: &[u8]) -> Result<Checksum, ChecksumError> {
    fletcher_4(buf, ByteOrder::Byteswap)
}

/// Extends `running` with `buf`, as if `buf` had been appended to the data
/// `running` covers.
///
/// Short buffers are folded serially. Longer ones are checksummed in steps of
/// at most [`FLETCHER_4_INC_MAX_SIZE`] bytes and merged with
/// [`Checksum::combine`]. `running` is left untouched on error.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
pub fn fletcher_4_incremental(
    buf: &[u8],
    order: ByteOrder,
    running: &mut Checksum,
) -> Result<(), ChecksumError> {
    check_aligned(buf)?;

    if buf.len() < SPA_MINBLOCKSIZE {
        running.fold(buf, order);
        return Ok(());
    }

    let mut next_running = *running;
    for step in buf.chunks(INC_STEP) {
        let next = fletcher_4(step, order)?;
        next_running.combine(step.len() as u64, &next)?;
    }
    *running = next_running;
    Ok(())
}

/// [`fletcher_4_incremental`] in native byte order.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
pub fn fletcher_4_incremental_native(
    buf: &[u8],
    running: &mut Checksum,
) -> Result<(), ChecksumError> {
    fletcher_4_incremental(buf, ByteOrder::Native, running)
}

/// [`fletcher_4_incremental`] with every word byte-reversed.
///
/// # Errors
///
/// Returns [`ChecksumError::UnalignedLength`] when `buf` is not made of whole
/// 32-bit words.
pub fn fletcher_4_incremental_byteswap(
    buf: &[u8],
    running: &mut Checksum,
) -> Result<(), ChecksumError> {
    fletcher_4_incremental(buf, ByteOrder::Byteswap, running)
}
