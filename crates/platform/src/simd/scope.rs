use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::OnceLock;

use super::policy::PolicyError;

/// Host environment hooks around vector register use.
///
/// A preemptible kernel, a hypervisor or an embedding runtime that shares the
/// vector register file with other work implements this trait to save and
/// restore that state. Ordinary user-space processes need nothing beyond the
/// default no-op methods because the operating system already preserves
/// vector registers across context switches.
pub trait VectorHost: Send + Sync {
    /// Reports whether vector registers may be used in the current context.
    fn allowed(&self) -> bool {
        true
    }

    /// Makes the vector register file safe to use. Called by [`VectorScope::begin`].
    fn begin(&self) {}

    /// Releases the vector register file. Called when a [`VectorScope`] drops.
    fn end(&self) {}
}

/// Vector host for ordinary user-space processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserspaceHost;

impl VectorHost for UserspaceHost {}

static USERSPACE_HOST: UserspaceHost = UserspaceHost;
static HOST: OnceLock<&'static dyn VectorHost> = OnceLock::new();

/// Installs the process-wide vector host.
///
/// Must happen before the first vector scope is opened or the first
/// availability query is answered; afterwards the resolved host is fixed.
pub fn install_host(host: &'static dyn VectorHost) -> Result<(), PolicyError> {
    HOST.set(host).map_err(|_| PolicyError::HostAlreadyInstalled)?;
    tracing::debug!(target: "platform::simd", "custom vector host installed");
    Ok(())
}

pub(super) fn host() -> &'static dyn VectorHost {
    *HOST.get_or_init(|| &USERSPACE_HOST)
}

thread_local! {
    static SCOPE_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// RAII guard bracketing a region that keeps live values in vector registers.
///
/// The host's `begin` hook runs when the guard is created and its `end` hook
/// runs when the guard drops, on every exit path. Scopes do not nest: opening
/// a second scope on a thread that already holds one is a programming error
/// and panics. The guard is neither `Send` nor `Sync` because the acquired
/// state belongs to the current thread.
#[must_use = "the vector scope is released as soon as the guard is dropped"]
pub struct VectorScope {
    host: &'static dyn VectorHost,
    _thread_bound: PhantomData<*const ()>,
}

impl VectorScope {
    /// Acquires the vector execution context for the current thread.
    pub fn begin() -> Self {
        Self::begin_with(host())
    }

    fn begin_with(host: &'static dyn VectorHost) -> Self {
        SCOPE_ACTIVE.with(|active| {
            assert!(
                !active.get(),
                "vector scope is already active on this thread"
            );
            active.set(true);
        });
        host.begin();
        Self {
            host,
            _thread_bound: PhantomData,
        }
    }

    /// Reports whether the current thread holds a vector scope.
    #[must_use]
    pub fn is_active() -> bool {
        SCOPE_ACTIVE.with(Cell::get)
    }
}

impl Drop for VectorScope {
    fn drop(&mut self) {
        self.host.end();
        SCOPE_ACTIVE.with(|active| active.set(false));
    }
}

impl fmt::Debug for VectorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorScope").finish_non_exhaustive()
    }
}
