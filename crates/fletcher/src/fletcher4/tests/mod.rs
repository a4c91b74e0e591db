use super::*;

use proptest::prelude::*;
use test_support::{ne_words, reference_fletcher4};

/// Runs kernel `K` over `buf` in one `compute` call.
pub(super) fn checksum_with<K: Fletcher4Kernel>(buf: &[u8], order: ByteOrder) -> Checksum {
    let mut acc = Accumulator::<K>::init();
    acc.compute(buf, order);
    acc.finalize()
}

/// Checksums `buf` with every kernel compiled for this target.
pub(super) fn every_kernel(buf: &[u8], order: ByteOrder) -> Vec<(&'static str, Checksum)> {
    #[allow(unused_mut)]
    let mut results = vec![
        (Scalar::NAME, checksum_with::<Scalar>(buf, order)),
        (Superscalar2::NAME, checksum_with::<Superscalar2>(buf, order)),
        (Superscalar4::NAME, checksum_with::<Superscalar4>(buf, order)),
    ];

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    results.extend([
        (Sse2::NAME, checksum_with::<Sse2>(buf, order)),
        (Ssse3::NAME, checksum_with::<Ssse3>(buf, order)),
        (Avx2::NAME, checksum_with::<Avx2>(buf, order)),
    ]);

    #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
    results.push((Neon::NAME, checksum_with::<Neon>(buf, order)));

    results
}

pub(super) fn serial(buf: &[u8]) -> Checksum {
    Checksum::from(reference_fletcher4(&ne_words(buf)))
}

/// Buffers made of whole 16-byte groups, so every kernel accepts them.
pub(super) fn group_buffers() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<[u8; 16]>(), 0..=96).prop_map(|groups| groups.concat())
}

/// A group-aligned buffer plus split points on group boundaries.
pub(super) fn group_buffer_with_splits() -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    group_buffers().prop_flat_map(|buf| {
        let groups = buf.len() / 16;
        let splits = prop::collection::vec(0..=groups, 0..=6).prop_map(|mut splits| {
            splits.sort_unstable();
            splits.into_iter().map(|group| group * 16).collect::<Vec<_>>()
        });
        (Just(buf), splits)
    })
}

mod equivalence;
mod incremental;
