#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `fletcher` computes the 256-bit Fletcher-4 checksum used to protect data
//! blocks in a storage engine. The checksum is four wrapping 64-bit words
//! `(A, B, C, D)`: `A` sums the 32-bit input words and each further word sums
//! the running values of the previous one.
//!
//! # Design
//!
//! - [`fletcher4`] holds the kernels. Each implements the sealed
//!   [`Fletcher4Kernel`] trait; [`fletcher4::Accumulator`] binds lane state to
//!   one kernel at the type level.
//! - [`Backend`] enumerates the kernels compiled for the target and
//!   [`Backend::REGISTRY`] lists them fastest first. [`Fletcher4Context`] is
//!   the runtime-selected accumulator; its backend tag and lane state are a
//!   single enum variant.
//! - [`select_backend`] scans the registry once per process. The [`Selector`]
//!   read from `FLETCHER4_IMPL` (or set with [`set_selector`]) can pin a
//!   backend or rotate through all of them.
//! - [`fletcher_4_native`], [`fletcher_4_byteswap`] and the incremental
//!   variants accept any word-aligned buffer; [`Fletcher4`] accepts input in
//!   chunks of any length.
//! - Vector kernels run inside a [`platform::simd::VectorScope`] and fall
//!   back to the portable kernel with the same lane layout when vector
//!   execution is unavailable.
//!
//! # Invariants
//!
//! - Every backend produces the same checksum as the serial definition for
//!   every input.
//! - Byteswap mode over a buffer equals native mode over the same buffer with
//!   each 32-bit word byte-reversed.
//! - Empty input checksums to [`Checksum::ZERO`].
//!
//! # Errors
//!
//! Checksum arithmetic never fails. [`ChecksumError`] reports inputs that are
//! not made of whole words, incremental steps that are too large, and
//! invalid implementation overrides. Feeding a context a buffer that is not a
//! multiple of its group size is a contract violation and panics.
//!
//! # Examples
//!
//! ```
//! use fletcher::{ByteOrder, Checksum, select_backend};
//!
//! let data: Vec<u8> = (1u32..=4).flat_map(u32::to_ne_bytes).collect();
//!
//! let mut ctx = select_backend().init();
//! ctx.compute(&data[..16], ByteOrder::Native);
//! assert_eq!(ctx.finalize(), Checksum::new(10, 20, 35, 56));
//! ```

mod backend;
pub mod bench;
mod byte_order;
mod checksum;
mod error;
pub mod fletcher4;
mod hasher;
mod oneshot;
#[cfg(feature = "parallel")]
pub mod parallel;
mod select;

pub use backend::{Backend, Fletcher4Context};
pub use byte_order::ByteOrder;
pub use checksum::{Checksum, FLETCHER_4_INC_MAX_SIZE};
pub use error::ChecksumError;
pub use fletcher4::Fletcher4Kernel;
pub use hasher::Fletcher4;
pub use oneshot::{
    FLETCHER_MIN_SIMD_SIZE, SPA_MINBLOCKSIZE, fletcher_4, fletcher_4_byteswap,
    fletcher_4_incremental, fletcher_4_incremental_byteswap, fletcher_4_incremental_native,
    fletcher_4_native, fletcher_4_with,
};
pub use select::{IMPL_ENV, Selector, select_backend, selector, set_selector};
