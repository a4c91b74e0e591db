use std::io;

use fletcher::ChecksumError;
use logging::FlagParseError;
use platform::simd::PolicyError;
use thiserror::Error;

/// Exit status for a run without errors.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when any input could not be read or checksummed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for invalid command lines.
pub const EXIT_USAGE: i32 = 2;

/// Failures reported by the front-end.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input could not be opened or read.
    #[error("{path}: {source}")]
    Read {
        /// Operand as given on the command line.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// An input was read but is not a whole number of 32-bit words.
    #[error("{path}: {source}")]
    Checksum {
        /// Operand as given on the command line.
        path: String,
        /// Checksum failure.
        #[source]
        source: ChecksumError,
    },
    /// Standard output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    /// A `--debug` value was not understood.
    #[error("invalid --debug value: {0}")]
    Debug(#[from] FlagParseError),
    /// `--impl` named no usable backend or came too late.
    #[error("invalid --impl value `{name}`: {source}")]
    Implementation {
        /// Value passed to `--impl`.
        name: String,
        /// Selection failure.
        #[source]
        source: ChecksumError,
    },
    /// `--no-simd` could not be applied.
    #[error("cannot disable vector execution: {0}")]
    Policy(#[from] PolicyError),
}

impl CliError {
    /// Exit status this error maps to.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. } | Self::Checksum { .. } | Self::Output(_) => EXIT_FAILURE,
            Self::Debug(_) | Self::Implementation { .. } | Self::Policy(_) => EXIT_USAGE,
        }
    }
}
