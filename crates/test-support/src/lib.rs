//! Shared fixtures for the fletcher workspace tests.
//!
//! The generators here are deterministic so golden values computed from
//! them stay stable across runs and platforms. Buffers are built with
//! `to_ne_bytes`, which makes a native-order checksum of the buffer equal
//! to [`reference_fletcher4`] over the original words on any host.

use std::io::{self, Write};

use tempfile::NamedTempFile;

/// Deterministic pseudo-random words from a 64-bit LCG.
///
/// Each word is the high half of the state after one step of
/// `x = x * 6364136223846793005 + 1442695040888963407`.
#[must_use]
pub fn lcg_words(count: usize, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 32) as u32
        })
        .collect()
}

/// Serializes words in host byte order.
#[must_use]
pub fn words_to_ne_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_ne_bytes()).collect()
}

/// Reads whole host-order words; a trailing partial word is dropped.
#[must_use]
pub fn ne_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|word| u32::from_ne_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}

/// Reverses the bytes of every whole 32-bit word.
#[must_use]
pub fn byteswap_words(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(4)
        .flat_map(|word| [word[3], word[2], word[1], word[0]])
        .collect()
}

/// Textbook serial Fletcher-4 over `words`, returned as `[A, B, C, D]`.
#[must_use]
pub fn reference_fletcher4(words: &[u32]) -> [u64; 4] {
    let (mut a, mut b, mut c, mut d) = (0u64, 0u64, 0u64, 0u64);
    for &word in words {
        a = a.wrapping_add(u64::from(word));
        b = b.wrapping_add(a);
        c = c.wrapping_add(b);
        d = d.wrapping_add(c);
    }
    [a, b, c, d]
}

/// Writes `bytes` to a fresh temporary file, flushed so it can be reopened
/// by path.
pub fn temp_file_with(bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
