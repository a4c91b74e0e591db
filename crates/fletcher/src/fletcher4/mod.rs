//! Fletcher-4 accumulation kernels.
//!
//! Every kernel splits its input into `K` interleaved word streams: stream
//! `i` consumes words `i, i + K, i + 2K, ...` and keeps its own four-level
//! running-sum cascade. [`Fletcher4Kernel::finalize`] folds the `K` cascades
//! back into the checksum a single serial stream would have produced.
//!
//! The portable kernels ([`Scalar`], [`Superscalar2`], [`Superscalar4`]) are
//! always available. The vector kernels share the lane layout of one of the
//! portable kernels and fall back to it when the CPU or the vector policy
//! rules them out, so calling a vector kernel directly is always sound.

pub(crate) mod finalize;
pub(crate) mod superscalar;

#[cfg(all(target_arch = "aarch64", target_endian = "little"))]
mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;

#[cfg(test)]
mod tests;

use std::fmt;
use std::marker::PhantomData;

use crate::{ByteOrder, Checksum};

#[cfg(all(target_arch = "aarch64", target_endian = "little"))]
pub use neon::Neon;
pub use superscalar::{Scalar, Superscalar2, Superscalar4};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use x86::{Avx2, Sse2, Ssse3};

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// Four cascade levels of `K` interleaved 64-bit lanes.
///
/// `levels()[0]` holds the running word sums, `levels()[1]` the sums of
/// those, and so on up to `levels()[3]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Lanes<const K: usize> {
    levels: [[u64; K]; 4],
}

impl<const K: usize> Lanes<K> {
    /// All lanes zero.
    pub const ZERO: Self = Self {
        levels: [[0; K]; 4],
    };

    pub(crate) const fn from_levels(levels: [[u64; K]; 4]) -> Self {
        Self { levels }
    }

    /// Returns the cascade levels.
    #[must_use]
    pub const fn levels(&self) -> &[[u64; K]; 4] {
        &self.levels
    }

    pub(crate) const fn levels_mut(&mut self) -> &mut [[u64; K]; 4] {
        &mut self.levels
    }
}

impl<const K: usize> Default for Lanes<K> {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Operations shared by every Fletcher-4 kernel.
///
/// The trait is sealed; the set of kernels is fixed by this crate.
pub trait Fletcher4Kernel: Sealed + Copy + Send + Sync + 'static {
    /// Accumulator state owned by one checksum operation.
    type Lanes: Copy + fmt::Debug + Send + Sync;

    /// Diagnostic name, also accepted by [`Backend::from_name`](crate::Backend::from_name).
    const NAME: &'static str;

    /// Number of input bytes consumed per group. Inputs to the compute
    /// functions must be a multiple of this.
    const GROUP_BYTES: usize;

    /// Returns fully zeroed lanes.
    fn zeroed() -> Self::Lanes;

    /// Reports whether the kernel runs its own code path on this system.
    ///
    /// Pure: never acquires a vector scope.
    fn is_available() -> bool;

    /// Accumulates `buf` read as host-order words.
    fn compute_native(lanes: &mut Self::Lanes, buf: &[u8]);

    /// Accumulates `buf` with every word byte-reversed.
    fn compute_byteswap(lanes: &mut Self::Lanes, buf: &[u8]);

    /// Folds the interleaved lanes into the serial checksum.
    fn finalize(lanes: &Self::Lanes) -> Checksum;
}

/// Accumulator context statically bound to kernel `K`.
///
/// The lanes can only ever be advanced and finalized by `K`, and
/// [`finalize`](Self::finalize) consumes the context.
///
/// ```
/// use fletcher::ByteOrder;
/// use fletcher::fletcher4::{Accumulator, Superscalar4};
///
/// let words: Vec<u8> = [1u32, 2, 3, 4].iter().flat_map(|w| w.to_ne_bytes()).collect();
/// let mut acc = Accumulator::<Superscalar4>::init();
/// acc.compute(&words, ByteOrder::Native);
/// assert_eq!(acc.finalize().words(), [10, 20, 35, 56]);
/// ```
pub struct Accumulator<K: Fletcher4Kernel> {
    lanes: K::Lanes,
    _kernel: PhantomData<fn() -> K>,
}

impl<K: Fletcher4Kernel> Accumulator<K> {
    /// Creates a context with every lane zeroed.
    #[must_use]
    pub fn init() -> Self {
        Self {
            lanes: K::zeroed(),
            _kernel: PhantomData,
        }
    }

    /// Accumulates `buf` in the given byte order.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len()` is not a multiple of `K::GROUP_BYTES`.
    pub fn compute(&mut self, buf: &[u8], order: ByteOrder) {
        assert!(
            buf.len().is_multiple_of(K::GROUP_BYTES),
            "{} kernel consumes {}-byte groups but was given {} bytes",
            K::NAME,
            K::GROUP_BYTES,
            buf.len()
        );
        match order {
            ByteOrder::Native => K::compute_native(&mut self.lanes, buf),
            ByteOrder::Byteswap => K::compute_byteswap(&mut self.lanes, buf),
        }
    }

    /// Shorthand for [`compute`](Self::compute) with [`ByteOrder::Native`].
    pub fn compute_native(&mut self, buf: &[u8]) {
        self.compute(buf, ByteOrder::Native);
    }

    /// Shorthand for [`compute`](Self::compute) with [`ByteOrder::Byteswap`].
    pub fn compute_byteswap(&mut self, buf: &[u8]) {
        self.compute(buf, ByteOrder::Byteswap);
    }

    /// Returns the current lane state.
    #[must_use]
    pub const fn lanes(&self) -> &K::Lanes {
        &self.lanes
    }

    /// Consumes the context and returns the serial checksum.
    #[must_use]
    pub fn finalize(self) -> Checksum {
        K::finalize(&self.lanes)
    }
}

impl<K: Fletcher4Kernel> Default for Accumulator<K> {
    fn default() -> Self {
        Self::init()
    }
}

impl<K: Fletcher4Kernel> Clone for Accumulator<K> {
    fn clone(&self) -> Self {
        Self {
            lanes: self.lanes,
            _kernel: PhantomData,
        }
    }
}

impl<K: Fletcher4Kernel> fmt::Debug for Accumulator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("kernel", &K::NAME)
            .field("lanes", &self.lanes)
            .finish()
    }
}
