use std::ffi::OsStr;
use std::sync::OnceLock;

use thiserror::Error;

/// Environment variable that disables vector execution when set to a
/// non-empty value other than `0`.
pub const DISABLE_SIMD_ENV: &str = "FLETCHER_DISABLE_SIMD";

/// Administrative policy governing vector register use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VectorPolicy {
    /// Vector kernels may run when the CPU supports them.
    #[default]
    Enabled,
    /// Only portable scalar kernels may run.
    Disabled,
}

impl VectorPolicy {
    /// Returns `true` when the policy permits vector execution.
    #[must_use]
    pub const fn allows_vector(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Interprets the value of [`DISABLE_SIMD_ENV`].
    ///
    /// ```
    /// use platform::simd::VectorPolicy;
    /// use std::ffi::OsStr;
    ///
    /// assert_eq!(VectorPolicy::from_env_value(None), VectorPolicy::Enabled);
    /// assert_eq!(VectorPolicy::from_env_value(Some(OsStr::new("0"))), VectorPolicy::Enabled);
    /// assert_eq!(VectorPolicy::from_env_value(Some(OsStr::new("1"))), VectorPolicy::Disabled);
    /// ```
    #[must_use]
    pub fn from_env_value(value: Option<&OsStr>) -> Self {
        match value {
            None => Self::Enabled,
            Some(value) if value.is_empty() || value == OsStr::new("0") => Self::Enabled,
            Some(_) => Self::Disabled,
        }
    }
}

/// Errors raised when reconfiguring process-wide vector state too late.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum PolicyError {
    /// The policy was already resolved to a different value.
    #[error("vector execution policy is already fixed for this process")]
    AlreadyInitialized,
    /// A vector host was already installed or resolved.
    #[error("a vector execution host is already installed for this process")]
    HostAlreadyInstalled,
}

static POLICY: OnceLock<VectorPolicy> = OnceLock::new();

/// Returns the process-wide vector policy, resolving it from the environment
/// on first use.
#[must_use]
pub fn vector_policy() -> VectorPolicy {
    *POLICY.get_or_init(|| {
        let policy = VectorPolicy::from_env_value(std::env::var_os(DISABLE_SIMD_ENV).as_deref());
        if !policy.allows_vector() {
            tracing::debug!(
                target: "platform::simd",
                env = DISABLE_SIMD_ENV,
                "vector execution disabled by environment"
            );
        }
        policy
    })
}

/// Fixes the process-wide vector policy.
///
/// Must be called before the first checksum backend is selected. Setting the
/// value the policy already resolved to is accepted.
pub fn set_vector_policy(policy: VectorPolicy) -> Result<(), PolicyError> {
    match POLICY.set(policy) {
        Ok(()) => {
            tracing::debug!(target: "platform::simd", ?policy, "vector policy set");
            Ok(())
        }
        Err(_) if vector_policy() == policy => Ok(()),
        Err(_) => Err(PolicyError::AlreadyInitialized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_values_map_to_policy() {
        assert_eq!(
            VectorPolicy::from_env_value(Some(OsStr::new(""))),
            VectorPolicy::Enabled
        );
        assert_eq!(
            VectorPolicy::from_env_value(Some(OsStr::new("yes"))),
            VectorPolicy::Disabled
        );
    }

    #[test]
    fn resetting_to_resolved_value_is_accepted() {
        let current = vector_policy();
        assert_eq!(set_vector_policy(current), Ok(()));

        let other = if current.allows_vector() {
            VectorPolicy::Disabled
        } else {
            VectorPolicy::Enabled
        };
        assert_eq!(
            set_vector_policy(other),
            Err(PolicyError::AlreadyInitialized)
        );
    }
}
