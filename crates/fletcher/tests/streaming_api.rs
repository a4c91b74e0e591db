//! Public streaming and incremental APIs agree with one-shot checksums.

use std::io::{Cursor, IoSlice};

use fletcher::{
    Backend, ByteOrder, Checksum, ChecksumError, FLETCHER_4_INC_MAX_SIZE, Fletcher4,
    fletcher_4_byteswap, fletcher_4_incremental_byteswap, fletcher_4_incremental_native,
    fletcher_4_native, select_backend,
};
use proptest::prelude::*;
use test_support::{byteswap_words, lcg_words, words_to_ne_bytes};

fn word_data() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u32>(), 0..=2048).prop_map(|words| words_to_ne_bytes(&words))
}

proptest! {
    #[test]
    fn hasher_matches_one_shot_for_random_chunks(
        data in word_data(),
        chunk in 1usize..=200,
    ) {
        let mut hasher = Fletcher4::new(ByteOrder::Native);
        for piece in data.chunks(chunk) {
            hasher.update(piece);
        }
        prop_assert_eq!(hasher.finalize()?, fletcher_4_native(&data)?);
    }

    #[test]
    fn incremental_over_word_chunks_matches_one_shot(
        data in word_data(),
        words_per_step in 1usize..=400,
    ) {
        let mut native = Checksum::ZERO;
        let mut swapped = Checksum::ZERO;
        for step in data.chunks(words_per_step * 4) {
            fletcher_4_incremental_native(step, &mut native)?;
            fletcher_4_incremental_byteswap(step, &mut swapped)?;
        }
        prop_assert_eq!(native, fletcher_4_native(&data)?);
        prop_assert_eq!(swapped, fletcher_4_byteswap(&data)?);
    }

    #[test]
    fn combine_merges_independent_checksums(
        head in word_data(),
        tail in word_data(),
    ) {
        let mut running = fletcher_4_native(&head)?;
        running.combine(tail.len() as u64, &fletcher_4_native(&tail)?)?;

        let joined = [head.as_slice(), tail.as_slice()].concat();
        prop_assert_eq!(running, fletcher_4_native(&joined)?);
    }
}

#[test]
fn context_lifecycle_through_selected_backend() {
    let backend = select_backend();
    let words = lcg_words(4096, 21);
    let buf = words_to_ne_bytes(&words);

    let mut ctx = backend.init();
    assert_eq!(ctx.backend(), backend);
    for block in buf.chunks(1024) {
        ctx.compute(block, ByteOrder::Native);
    }
    assert_eq!(Ok(ctx.finalize()), fletcher_4_native(&buf));
}

#[test]
fn byteswap_hasher_reads_foreign_data() {
    let words = lcg_words(333, 6);
    let foreign = byteswap_words(&words_to_ne_bytes(&words));

    let mut hasher = Fletcher4::with_backend(Backend::Superscalar2, ByteOrder::Byteswap);
    hasher.update_vectored(&[IoSlice::new(&foreign[..5]), IoSlice::new(&foreign[5..])]);
    assert_eq!(hasher.finalize(), fletcher_4_native(&words_to_ne_bytes(&words)));
}

#[test]
fn reader_api_streams_whole_input() {
    let buf = words_to_ne_bytes(&lcg_words(70_000, 1));
    let mut hasher = Fletcher4::new(ByteOrder::Native);
    let read = hasher
        .update_reader(&mut Cursor::new(buf.as_slice()))
        .expect("cursor reads succeed");

    assert_eq!(read, buf.len() as u64);
    assert_eq!(hasher.len(), buf.len() as u64);
    assert_eq!(hasher.finalize(), fletcher_4_native(&buf));
}

#[test]
fn unaligned_inputs_are_reported() {
    assert_eq!(
        fletcher_4_byteswap(&[0u8; 7]),
        Err(ChecksumError::UnalignedLength { len: 7 })
    );

    let mut hasher = Fletcher4::default();
    hasher.update(&[0u8; 129]);
    assert_eq!(
        hasher.finalize(),
        Err(ChecksumError::UnalignedLength { len: 129 })
    );

    let mut running = Checksum::ZERO;
    assert_eq!(
        running.combine(FLETCHER_4_INC_MAX_SIZE * 2, &Checksum::ZERO),
        Err(ChecksumError::IncrementalStepTooLarge {
            size: FLETCHER_4_INC_MAX_SIZE * 2,
            max: FLETCHER_4_INC_MAX_SIZE,
        })
    );
}
