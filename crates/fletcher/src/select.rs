use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Backend;
use crate::error::ChecksumError;

/// Environment variable read once to pick the process-wide [`Selector`].
pub const IMPL_ENV: &str = "FLETCHER4_IMPL";

static FASTEST: OnceLock<Backend> = OnceLock::new();
static SELECTOR: OnceLock<Selector> = OnceLock::new();
static CYCLE_POSITION: AtomicUsize = AtomicUsize::new(0);

/// Returns the first available backend in registry order.
///
/// The registry is scanned once; later calls return the cached choice
/// without querying the CPU again.
#[must_use]
pub fn select_backend() -> Backend {
    *FASTEST.get_or_init(|| {
        let backend = Backend::available().next().unwrap_or(Backend::Scalar);
        tracing::debug!(
            target: "fletcher::select",
            backend = backend.name(),
            "selected fastest fletcher4 implementation"
        );
        backend
    })
}

/// Policy deciding which backend checksum operations use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Selector {
    /// The first available backend in registry order.
    #[default]
    Fastest,
    /// Every operation uses the next available backend in turn.
    Cycle,
    /// Always use this backend.
    Fixed(Backend),
}

impl Selector {
    /// Resolves the backend for the next checksum operation.
    #[must_use]
    pub fn backend(self) -> Backend {
        match self {
            Self::Fastest => select_backend(),
            Self::Fixed(backend) => backend,
            Self::Cycle => {
                let count = Backend::available().count();
                let position = CYCLE_POSITION.fetch_add(1, Ordering::Relaxed) % count.max(1);
                Backend::available()
                    .nth(position)
                    .unwrap_or(Backend::Scalar)
            }
        }
    }
}

impl FromStr for Selector {
    type Err = ChecksumError;

    /// Parses `fastest`, `cycle`, or a backend name.
    ///
    /// # Errors
    ///
    /// Unknown names yield [`ChecksumError::UnknownBackend`]; names of
    /// backends that cannot run here yield [`ChecksumError::UnavailableBackend`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fastest" => Ok(Self::Fastest),
            "cycle" => Ok(Self::Cycle),
            name => {
                let backend = Backend::from_name(name)?;
                if !backend.is_available() {
                    return Err(ChecksumError::UnavailableBackend {
                        name: backend.name(),
                    });
                }
                Ok(Self::Fixed(backend))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fastest => f.write_str("fastest"),
            Self::Cycle => f.write_str("cycle"),
            Self::Fixed(backend) => f.write_str(backend.name()),
        }
    }
}

fn selector_from_env() -> Selector {
    let Ok(value) = std::env::var(IMPL_ENV) else {
        return Selector::Fastest;
    };
    match value.parse() {
        Ok(selector) => {
            tracing::debug!(
                target: "fletcher::select",
                %selector,
                env = IMPL_ENV,
                "selector from environment"
            );
            selector
        }
        Err(error) => {
            tracing::warn!(
                target: "fletcher::select",
                env = IMPL_ENV,
                %value,
                %error,
                "ignoring invalid implementation override"
            );
            Selector::Fastest
        }
    }
}

/// Returns the process-wide selector, reading [`IMPL_ENV`] on first use.
#[must_use]
pub fn selector() -> Selector {
    *SELECTOR.get_or_init(selector_from_env)
}

/// Fixes the process-wide selector.
///
/// Must run before the first checksum operation; re-setting the value
/// already in effect is accepted.
///
/// # Errors
///
/// Returns [`ChecksumError::SelectorLocked`] when a different selector is
/// already in effect.
pub fn set_selector(selector: Selector) -> Result<(), ChecksumError> {
    match SELECTOR.set(selector) {
        Ok(()) => {
            tracing::debug!(target: "fletcher::select", %selector, "selector set");
            Ok(())
        }
        Err(_) if self::selector() == selector => Ok(()),
        Err(_) => Err(ChecksumError::SelectorLocked),
    }
}

/// Backend used by the next one-shot, incremental or streaming operation.
pub(crate) fn backend_for_operation() -> Backend {
    selector().backend()
}
