//! x86 and x86_64 vector kernels.
//!
//! # Safety
//!
//! The `#[target_feature]` functions are only entered after
//! [`platform::simd::cpu_supports`] confirmed the instruction set and the
//! vector policy allowed its use. Otherwise the safe wrappers fall back to the
//! portable kernel with the same lane layout, so results never depend on the
//! path taken.
//!
//! All loads and stores are unaligned (`loadu`/`storeu`) and stay within the
//! 16-byte chunks yielded by `chunks_exact` or the lane arrays themselves.
//!
//! Every vector region runs inside a [`VectorScope`], which is released when
//! the kernel returns or unwinds.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

#[cfg(target_arch = "x86")]
use std::arch::x86::{
    __m128i, __m256i, _mm_add_epi64, _mm_loadu_si128, _mm_or_si128, _mm_set_epi8,
    _mm_setzero_si128, _mm_shuffle_epi8, _mm_slli_epi16, _mm_slli_epi32, _mm_srli_epi16,
    _mm_srli_epi32, _mm_storeu_si128, _mm_unpackhi_epi32, _mm_unpacklo_epi32,
    _mm256_add_epi64, _mm256_cvtepu32_epi64, _mm256_loadu_si256, _mm256_storeu_si256,
};
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{
    __m128i, __m256i, _mm_add_epi64, _mm_loadu_si128, _mm_or_si128, _mm_set_epi8,
    _mm_setzero_si128, _mm_shuffle_epi8, _mm_slli_epi16, _mm_slli_epi32, _mm_srli_epi16,
    _mm_srli_epi32, _mm_storeu_si128, _mm_unpackhi_epi32, _mm_unpacklo_epi32,
    _mm256_add_epi64, _mm256_cvtepu32_epi64, _mm256_loadu_si256, _mm256_storeu_si256,
};

use platform::simd::{self, VectorFeature, VectorScope};

use super::{Fletcher4Kernel, Lanes, Sealed, Superscalar2, Superscalar4, finalize};
use crate::Checksum;

const BLOCK_LEN: usize = 16;

fn vector_available(feature: VectorFeature) -> bool {
    simd::cpu_supports(feature) && simd::is_vector_execution_allowed()
}

/// SSE2 kernel: two 64-bit lanes per register, two cascade steps per
/// 16-byte block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Sse2;

impl Sealed for Sse2 {}

impl Sse2 {
    fn run<const SWAP: bool>(lanes: &mut Lanes<2>, buf: &[u8]) {
        if !Self::is_available() {
            if SWAP {
                Superscalar2::compute_byteswap(lanes, buf);
            } else {
                Superscalar2::compute_native(lanes, buf);
            }
            return;
        }

        let _scope = VectorScope::begin();
        // SAFETY: SSE2 support was confirmed by `is_available`.
        unsafe { compute_sse2::<SWAP>(lanes, buf) }
    }
}

impl Fletcher4Kernel for Sse2 {
    type Lanes = Lanes<2>;

    const NAME: &'static str = "sse2";
    const GROUP_BYTES: usize = BLOCK_LEN;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        vector_available(VectorFeature::Sse2)
    }

    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]) {
        Self::run::<false>(lanes, buf);
    }

    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]) {
        Self::run::<true>(lanes, buf);
    }

    fn finalize(lanes: &Self::Lanes) -> Checksum {
        finalize::two_lanes(lanes)
    }
}

/// SSSE3 kernel: the SSE2 lane layout with a single-shuffle byte swap.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Ssse3;

impl Sealed for Ssse3 {}

impl Ssse3 {
    fn run<const SWAP: bool>(lanes: &mut Lanes<2>, buf: &[u8]) {
        if !Self::is_available() {
            if SWAP {
                Superscalar2::compute_byteswap(lanes, buf);
            } else {
                Superscalar2::compute_native(lanes, buf);
            }
            return;
        }

        let _scope = VectorScope::begin();
        // SAFETY: SSSE3 support was confirmed by `is_available`.
        unsafe { compute_ssse3::<SWAP>(lanes, buf) }
    }
}

impl Fletcher4Kernel for Ssse3 {
    type Lanes = Lanes<2>;

    const NAME: &'static str = "ssse3";
    const GROUP_BYTES: usize = BLOCK_LEN;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        vector_available(VectorFeature::Ssse3)
    }

    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]) {
        Self::run::<false>(lanes, buf);
    }

    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]) {
        Self::run::<true>(lanes, buf);
    }

    fn finalize(lanes: &Self::Lanes) -> Checksum {
        finalize::two_lanes(lanes)
    }
}

/// AVX2 kernel: four 64-bit lanes, one cascade step per 16-byte block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Avx2;

impl Sealed for Avx2 {}

impl Avx2 {
    fn run<const SWAP: bool>(lanes: &mut Lanes<4>, buf: &[u8]) {
        if !Self::is_available() {
            if SWAP {
                Superscalar4::compute_byteswap(lanes, buf);
            } else {
                Superscalar4::compute_native(lanes, buf);
            }
            return;
        }

        let _scope = VectorScope::begin();
        // SAFETY: AVX2 support was confirmed by `is_available`.
        unsafe { compute_avx2::<SWAP>(lanes, buf) }
    }
}

impl Fletcher4Kernel for Avx2 {
    type Lanes = Lanes<4>;

    const NAME: &'static str = "avx2";
    const GROUP_BYTES: usize = BLOCK_LEN;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        vector_available(VectorFeature::Avx2)
    }

    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]) {
        Self::run::<false>(lanes, buf);
    }

    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]) {
        Self::run::<true>(lanes, buf);
    }

    fn finalize(lanes: &Self::Lanes) -> Checksum {
        finalize::four_lanes(lanes)
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load_pair_lanes(lanes: &Lanes<2>) -> [__m128i; 4] {
    let [a, b, c, d] = lanes.levels();
    [
        _mm_loadu_si128(a.as_ptr().cast()),
        _mm_loadu_si128(b.as_ptr().cast()),
        _mm_loadu_si128(c.as_ptr().cast()),
        _mm_loadu_si128(d.as_ptr().cast()),
    ]
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store_pair_lanes(state: [__m128i; 4], lanes: &mut Lanes<2>) {
    for (level, value) in lanes.levels_mut().iter_mut().zip(state) {
        _mm_storeu_si128(level.as_mut_ptr().cast(), value);
    }
}

/// Widens the four words of `block` into two cascade steps.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn cascade_block(state: &mut [__m128i; 4], block: __m128i) {
    let zero = _mm_setzero_si128();
    for words in [
        _mm_unpacklo_epi32(block, zero),
        _mm_unpackhi_epi32(block, zero),
    ] {
        state[0] = _mm_add_epi64(state[0], words);
        state[1] = _mm_add_epi64(state[1], state[0]);
        state[2] = _mm_add_epi64(state[2], state[1]);
        state[3] = _mm_add_epi64(state[3], state[2]);
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn bswap32_sse2(block: __m128i) -> __m128i {
    let halves = _mm_or_si128(_mm_slli_epi16(block, 8), _mm_srli_epi16(block, 8));
    _mm_or_si128(_mm_slli_epi32(halves, 16), _mm_srli_epi32(halves, 16))
}

#[inline]
#[target_feature(enable = "ssse3")]
unsafe fn bswap32_mask() -> __m128i {
    _mm_set_epi8(12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3)
}

#[target_feature(enable = "sse2")]
unsafe fn compute_sse2<const SWAP: bool>(lanes: &mut Lanes<2>, buf: &[u8]) {
    let mut state = load_pair_lanes(lanes);
    for chunk in buf.chunks_exact(BLOCK_LEN) {
        let mut block = _mm_loadu_si128(chunk.as_ptr().cast());
        if SWAP {
            block = bswap32_sse2(block);
        }
        cascade_block(&mut state, block);
    }
    store_pair_lanes(state, lanes);
}

#[target_feature(enable = "ssse3")]
unsafe fn compute_ssse3<const SWAP: bool>(lanes: &mut Lanes<2>, buf: &[u8]) {
    let mask = bswap32_mask();
    let mut state = load_pair_lanes(lanes);
    for chunk in buf.chunks_exact(BLOCK_LEN) {
        let mut block = _mm_loadu_si128(chunk.as_ptr().cast());
        if SWAP {
            block = _mm_shuffle_epi8(block, mask);
        }
        cascade_block(&mut state, block);
    }
    store_pair_lanes(state, lanes);
}

#[target_feature(enable = "avx2")]
unsafe fn compute_avx2<const SWAP: bool>(lanes: &mut Lanes<4>, buf: &[u8]) {
    let mask = bswap32_mask();
    let [a, b, c, d] = lanes.levels();
    let mut state: [__m256i; 4] = [
        _mm256_loadu_si256(a.as_ptr().cast()),
        _mm256_loadu_si256(b.as_ptr().cast()),
        _mm256_loadu_si256(c.as_ptr().cast()),
        _mm256_loadu_si256(d.as_ptr().cast()),
    ];

    for chunk in buf.chunks_exact(BLOCK_LEN) {
        let mut block = _mm_loadu_si128(chunk.as_ptr().cast());
        if SWAP {
            block = _mm_shuffle_epi8(block, mask);
        }
        let words = _mm256_cvtepu32_epi64(block);
        state[0] = _mm256_add_epi64(state[0], words);
        state[1] = _mm256_add_epi64(state[1], state[0]);
        state[2] = _mm256_add_epi64(state[2], state[1]);
        state[3] = _mm256_add_epi64(state[3], state[2]);
    }

    for (level, value) in lanes.levels_mut().iter_mut().zip(state) {
        _mm256_storeu_si256(level.as_mut_ptr().cast(), value);
    }
}
