use thiserror::Error;

/// Errors surfaced by the Fletcher-4 checksum API.
///
/// The checksum arithmetic itself cannot fail; every variant describes a
/// caller-supplied value the engine refuses to interpret.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ChecksumError {
    /// The input is not made of whole 32-bit words.
    #[error("fletcher4 input of {len} bytes is not a multiple of 4")]
    UnalignedLength {
        /// Number of bytes supplied by the caller.
        len: usize,
    },
    /// An incremental step is too large to combine without overflow.
    #[error("incremental fletcher4 step of {size} bytes exceeds the {max} byte limit")]
    IncrementalStepTooLarge {
        /// Size of the step in bytes.
        size: u64,
        /// Largest step accepted by [`Checksum::combine`](crate::Checksum::combine).
        max: u64,
    },
    /// The requested implementation name is not part of the registry.
    #[error("unknown fletcher4 implementation `{name}`")]
    UnknownBackend {
        /// Name supplied by the caller.
        name: String,
    },
    /// The requested implementation exists but cannot run on this system.
    #[error("fletcher4 implementation `{name}` is not available on this system")]
    UnavailableBackend {
        /// Name of the unavailable implementation.
        name: &'static str,
    },
    /// The implementation selector was already fixed for this process.
    #[error("fletcher4 implementation already selected; the selector can no longer change")]
    SelectorLocked,
}
