//! aarch64 NEON kernel.
//!
//! # Safety
//!
//! The vector path is entered only after [`platform::simd::cpu_supports`]
//! reported NEON and the vector policy allowed it; otherwise the portable
//! two-lane kernel runs instead. `vld1q_*`/`vst1q_*` have no alignment
//! requirement and only touch 16-byte chunks or the lane arrays.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::aarch64::{
    vaddq_u64, vget_low_u32, vld1q_u8, vld1q_u64, vmovl_high_u32, vmovl_u32,
    vreinterpretq_u32_u8, vrev32q_u8, vst1q_u64,
};

use platform::simd::{self, VectorFeature, VectorScope};

use super::{Fletcher4Kernel, Lanes, Sealed, Superscalar2, finalize};
use crate::Checksum;

const BLOCK_LEN: usize = 16;

/// NEON kernel: two 64-bit lanes per register, two cascade steps per
/// 16-byte block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Neon;

impl Sealed for Neon {}

impl Neon {
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
        // SAFETY: NEON support was confirmed by `is_available`.
        unsafe { compute_neon::<SWAP>(lanes, buf) }
    }
}

impl Fletcher4Kernel for Neon {
    type Lanes = Lanes<2>;

    const NAME: &'static str = "aarch64_neon";
    const GROUP_BYTES: usize = BLOCK_LEN;

    fn zeroed() -> Self::Lanes {
        Lanes::ZERO
    }

    fn is_available() -> bool {
        simd::cpu_supports(VectorFeature::Neon) && simd::is_vector_execution_allowed()
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

#[target_feature(enable = "neon")]
unsafe fn compute_neon<const SWAP: bool>(lanes: &mut Lanes<2>, buf: &[u8]) {
    let [a, b, c, d] = lanes.levels();
    let mut state = [
        vld1q_u64(a.as_ptr()),
        vld1q_u64(b.as_ptr()),
        vld1q_u64(c.as_ptr()),
        vld1q_u64(d.as_ptr()),
    ];

    for chunk in buf.chunks_exact(BLOCK_LEN) {
        let mut bytes = vld1q_u8(chunk.as_ptr());
        if SWAP {
            bytes = vrev32q_u8(bytes);
        }
        let words = vreinterpretq_u32_u8(bytes);

        for wide in [vmovl_u32(vget_low_u32(words)), vmovl_high_u32(words)] {
            state[0] = vaddq_u64(state[0], wide);
            state[1] = vaddq_u64(state[1], state[0]);
            state[2] = vaddq_u64(state[2], state[1]);
            state[3] = vaddq_u64(state[3], state[2]);
        }
    }

    for (level, value) in lanes.levels_mut().iter_mut().zip(state) {
        vst1q_u64(level.as_mut_ptr(), value);
    }
}
