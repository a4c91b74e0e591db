//! Portable kernels: the serial reference and the 2- and 4-way interleaved
//! superscalar variants.

use super::{Fletcher4Kernel, Lanes, Sealed, finalize};
use crate::Checksum;

/// Advances `K` interleaved cascades over `buf`.
///
/// Consumes whole groups of `4 * K` bytes; callers guarantee the length.
#[inline]
pub(crate) fn accumulate<const K: usize, const SWAP: bool>(lanes: &mut Lanes<K>, buf: &[u8]) {
    let [a, b, c, d] = lanes.levels_mut();

    for group in buf.chunks_exact(4 * K) {
        for (lane, word) in group.chunks_exact(4).enumerate() {
            let word = u32::from_ne_bytes([word[0], word[1], word[2], word[3]]);
            let word = if SWAP { word.swap_bytes() } else { word };

            a[lane] = a[lane].wrapping_add(u64::from(word));
            b[lane] = b[lane].wrapping_add(a[lane]);
            c[lane] = c[lane].wrapping_add(b[lane]);
            d[lane] = d[lane].wrapping_add(c[lane]);
        }
    }
}

/// Serial Fletcher-4, one word at a time. The reference every other kernel
/// must agree with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Scalar;

impl Sealed for Scalar {}

impl Fletcher4Kernel for Scalar {
    type Lanes = Lanes<1>;

    const NAME: &'static str = "scalar";
    const GROUP_BYTES: usize = 4;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        true
    }

    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]) {
        accumulate::<1, false>(lanes, buf);
    }

    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]) {
        accumulate::<1, true>(lanes, buf);
    }

    fn finalize(lanes: &Self::Lanes) -> Checksum {
        finalize::one_lane(lanes)
    }
}

/// Two independent cascades over alternating words.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Superscalar2;

impl Sealed for Superscalar2 {}

impl Fletcher4Kernel for Superscalar2 {
    type Lanes = Lanes<2>;

    const NAME: &'static str = "superscalar";
    const GROUP_BYTES: usize = 8;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        true
    }

    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]) {
        accumulate::<2, false>(lanes, buf);
    }

    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]) {
        accumulate::<2, true>(lanes, buf);
    }

    fn finalize(lanes: &Self::Lanes) -> Checksum {
        finalize::two_lanes(lanes)
    }
}

/// Four independent cascades, one per word of each 16-byte group.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Superscalar4;

impl Sealed for Superscalar4 {}

impl Fletcher4Kernel for Superscalar4 {
    type Lanes = Lanes<4>;

    const NAME: &'static str = "superscalar4";
    const GROUP_BYTES: usize = 16;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        true
    }

    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]) {
        accumulate::<4, false>(lanes, buf);
    }

    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]) {
        accumulate::<4, true>(lanes, buf);
    }

    fn finalize(lanes: &Self::Lanes) -> Checksum {
        finalize::four_lanes(lanes)
    }
}
