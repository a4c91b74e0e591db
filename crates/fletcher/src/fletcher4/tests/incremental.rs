use super::*;
use super::{checksum_with, group_buffer_with_splits};

fn chunked<K: Fletcher4Kernel>(buf: &[u8], splits: &[usize], order: ByteOrder) -> Checksum {
    let mut acc = Accumulator::<K>::init();
    let mut start = 0;
    for &end in splits.iter().chain(std::iter::once(&buf.len())) {
        acc.compute(&buf[start..end], order);
        start = end;
    }
    acc.finalize()
}

proptest! {
    #[test]
    fn split_compute_matches_single_call((buf, splits) in group_buffer_with_splits()) {
        for order in [ByteOrder::Native, ByteOrder::Byteswap] {
            prop_assert_eq!(
                chunked::<Scalar>(&buf, &splits, order),
                checksum_with::<Scalar>(&buf, order)
            );
            prop_assert_eq!(
                chunked::<Superscalar2>(&buf, &splits, order),
                checksum_with::<Superscalar2>(&buf, order)
            );
            prop_assert_eq!(
                chunked::<Superscalar4>(&buf, &splits, order),
                checksum_with::<Superscalar4>(&buf, order)
            );
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            {
                prop_assert_eq!(
                    chunked::<Sse2>(&buf, &splits, order),
                    checksum_with::<Sse2>(&buf, order)
                );
                prop_assert_eq!(
                    chunked::<Ssse3>(&buf, &splits, order),
                    checksum_with::<Ssse3>(&buf, order)
                );
                prop_assert_eq!(
                    chunked::<Avx2>(&buf, &splits, order),
                    checksum_with::<Avx2>(&buf, order)
                );
            }
            #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
            prop_assert_eq!(
                chunked::<Neon>(&buf, &splits, order),
                checksum_with::<Neon>(&buf, order)
            );
        }
    }
}

#[test]
fn cloned_context_continues_independently() {
    let head = [3u8; 32];
    let tail = [9u8; 48];

    let mut original = Accumulator::<Superscalar4>::init();
    original.compute_native(&head);
    let mut fork = original.clone();
    fork.compute_native(&tail);

    assert_eq!(original.finalize(), checksum_with::<Superscalar4>(&head, ByteOrder::Native));
    assert_eq!(
        fork.finalize(),
        checksum_with::<Superscalar4>(&[&head[..], &tail[..]].concat(), ByteOrder::Native)
    );
}

#[test]
fn init_always_starts_from_zero() {
    let acc = Accumulator::<Superscalar2>::init();
    assert_eq!(*acc.lanes(), Lanes::ZERO);
    assert_eq!(acc.finalize(), Checksum::ZERO);
}

#[test]
#[should_panic(expected = "16-byte groups")]
fn misaligned_compute_fails_fast() {
    let mut acc = Accumulator::<Superscalar4>::init();
    acc.compute_native(&[0u8; 12]);
}

#[test]
fn scalar_accepts_single_words() {
    let mut acc = Accumulator::<Scalar>::init();
    acc.compute_native(&7u32.to_ne_bytes());
    acc.compute_native(&8u32.to_ne_bytes());
    assert_eq!(acc.finalize().words(), [15, 22, 29, 36]);
}
