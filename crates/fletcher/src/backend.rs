use std::fmt;
use std::str::FromStr;

use crate::error::ChecksumError;
#[cfg(all(target_arch = "aarch64", target_endian = "little"))]
use crate::fletcher4::Neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::fletcher4::{Avx2, Sse2, Ssse3};
use crate::fletcher4::{Accumulator, Fletcher4Kernel, Scalar, Superscalar2, Superscalar4};
use crate::{ByteOrder, Checksum};

/// Fletcher-4 implementations compiled for this target.
///
/// Each variant names one [`Fletcher4Kernel`]. Variants for other
/// architectures are not compiled in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Serial reference kernel.
    Scalar,
    /// Two-way interleaved portable kernel.
    Superscalar2,
    /// Four-way interleaved portable kernel.
    Superscalar4,
    /// SSE2 two-lane kernel.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2,
    /// SSSE3 two-lane kernel.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Ssse3,
    /// AVX2 four-lane kernel.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,
    /// NEON two-lane kernel.
    #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
    Neon,
}

/// Expands `$body` once per backend with `$kernel` aliased to its kernel type.
macro_rules! with_kernel {
    ($backend:expr, $kernel:ident => $body:expr) => {
        match $backend {
            Backend::Scalar => {
                type $kernel = Scalar;
                $body
            }
            Backend::Superscalar2 => {
                type $kernel = Superscalar2;
                $body
            }
            Backend::Superscalar4 => {
                type $kernel = Superscalar4;
                $body
            }
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Sse2 => {
                type $kernel = Sse2;
                $body
            }
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Ssse3 => {
                type $kernel = Ssse3;
                $body
            }
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2 => {
                type $kernel = Avx2;
                $body
            }
            #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
            Backend::Neon => {
                type $kernel = Neon;
                $body
            }
        }
    };
}

impl Backend {
    /// Every compiled backend, fastest first.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub const REGISTRY: &'static [Self] = &[
        Self::Avx2,
        Self::Ssse3,
        Self::Sse2,
        Self::Superscalar4,
        Self::Superscalar2,
        Self::Scalar,
    ];

    /// Every compiled backend, fastest first.
    #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
    pub const REGISTRY: &'static [Self] = &[
        Self::Neon,
        Self::Superscalar4,
        Self::Superscalar2,
        Self::Scalar,
    ];

    /// Every compiled backend, fastest first.
    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        all(target_arch = "aarch64", target_endian = "little")
    )))]
    pub const REGISTRY: &'static [Self] = &[Self::Superscalar4, Self::Superscalar2, Self::Scalar];

    /// Diagnostic name of the backend.
    #[must_use]
    pub const fn name(self) -> &'static str {
        with_kernel!(self, K => K::NAME)
    }

    /// Input granularity in bytes accepted by [`Fletcher4Context::compute`].
    #[must_use]
    pub const fn group_bytes(self) -> usize {
        with_kernel!(self, K => K::GROUP_BYTES)
    }

    /// Reports whether the backend runs its own code path on this system.
    ///
    /// Reflects CPU support and the vector execution policy; never acquires
    /// vector state. The scalar backend is always available.
    #[must_use]
    pub fn is_available(self) -> bool {
        with_kernel!(self, K => K::is_available())
    }

    /// Looks a backend up by its diagnostic name.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::UnknownBackend`] when no compiled backend has
    /// that name.
    pub fn from_name(name: &str) -> Result<Self, ChecksumError> {
        Self::REGISTRY
            .iter()
            .copied()
            .find(|backend| backend.name() == name)
            .ok_or_else(|| ChecksumError::UnknownBackend {
                name: name.to_owned(),
            })
    }

    /// Iterates over the available backends in preference order.
    pub fn available() -> impl Iterator<Item = Self> {
        Self::REGISTRY
            .iter()
            .copied()
            .filter(|backend| backend.is_available())
    }

    /// Creates a zeroed accumulator context for this backend.
    ///
    /// Initializing a backend that is not available is allowed: its compute
    /// functions then run the portable kernel with the same lane layout.
    #[must_use]
    pub fn init(self) -> Fletcher4Context {
        let inner = match self {
            Self::Scalar => ContextInner::Scalar(Accumulator::init()),
            Self::Superscalar2 => ContextInner::Superscalar2(Accumulator::init()),
            Self::Superscalar4 => ContextInner::Superscalar4(Accumulator::init()),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Sse2 => ContextInner::Sse2(Accumulator::init()),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Ssse3 => ContextInner::Ssse3(Accumulator::init()),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Avx2 => ContextInner::Avx2(Accumulator::init()),
            #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
            Self::Neon => ContextInner::Neon(Accumulator::init()),
        };
        Fletcher4Context { inner }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Accumulator context of a runtime-selected backend.
///
/// The lane state and the backend tag are one enum variant, so a context can
/// only be advanced and finalized by the backend that created it.
#[derive(Clone, Debug)]
pub struct Fletcher4Context {
    inner: ContextInner,
}

#[derive(Clone, Debug)]
enum ContextInner {
    Scalar(Accumulator<Scalar>),
    Superscalar2(Accumulator<Superscalar2>),
    Superscalar4(Accumulator<Superscalar4>),
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2(Accumulator<Sse2>),
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Ssse3(Accumulator<Ssse3>),
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2(Accumulator<Avx2>),
    #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
    Neon(Accumulator<Neon>),
}

macro_rules! with_accumulator {
    ($inner:expr, $acc:ident => $body:expr) => {
        match $inner {
            ContextInner::Scalar($acc) => $body,
            ContextInner::Superscalar2($acc) => $body,
            ContextInner::Superscalar4($acc) => $body,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            ContextInner::Sse2($acc) => $body,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            ContextInner::Ssse3($acc) => $body,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            ContextInner::Avx2($acc) => $body,
            #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
            ContextInner::Neon($acc) => $body,
        }
    };
}

impl Fletcher4Context {
    /// Backend that owns this context.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        match &self.inner {
            ContextInner::Scalar(_) => Backend::Scalar,
            ContextInner::Superscalar2(_) => Backend::Superscalar2,
            ContextInner::Superscalar4(_) => Backend::Superscalar4,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            ContextInner::Sse2(_) => Backend::Sse2,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            ContextInner::Ssse3(_) => Backend::Ssse3,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            ContextInner::Avx2(_) => Backend::Avx2,
            #[cfg(all(target_arch = "aarch64", target_endian = "little"))]
            ContextInner::Neon(_) => Backend::Neon,
        }
    }

    /// Accumulates `buf` in the given byte order.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len()` is not a multiple of the backend's
    /// [`group_bytes`](Backend::group_bytes).
    pub fn compute(&mut self, buf: &[u8], order: ByteOrder) {
        with_accumulator!(&mut self.inner, acc => acc.compute(buf, order));
    }

    /// Consumes the context and returns the checksum of everything computed.
    #[must_use]
    pub fn finalize(self) -> Checksum {
        with_accumulator!(self.inner, acc => acc.finalize())
    }
}
