//! Vector execution facade: capability detection, policy and scoped acquisition.

mod features;
mod policy;
mod scope;

pub use features::{VectorFeature, cpu_supports};
pub use policy::{DISABLE_SIMD_ENV, PolicyError, VectorPolicy, set_vector_policy, vector_policy};
pub use scope::{UserspaceHost, VectorHost, VectorScope, install_host};

/// Reports whether vector registers may be used by checksum kernels.
///
/// This is a pure query: it never acquires a vector scope and is safe to call
/// from any context. Both the process policy and the installed host must
/// agree before vector execution is allowed.
#[must_use]
pub fn is_vector_execution_allowed() -> bool {
    vector_policy().allows_vector() && scope::host().allowed()
}
