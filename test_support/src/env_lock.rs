//! Serialise environment mutations across tests.
//!
//! Configuration loading reads `RSTDOCGEN_*` variables, so any test that sets
//! or clears one must hold [`EnvLock`] while it does.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that holds the global environment lock.
pub struct EnvLock {
    _guard: MutexGuard<'static, ()>,
}

impl fmt::Debug for EnvLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLock").finish_non_exhaustive()
    }
}

impl EnvLock {
    /// Acquire the lock. A poisoned lock is recovered, since the guarded
    /// state is the environment rather than the mutex payload.
    #[must_use]
    pub fn acquire() -> Self {
        let guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self { _guard: guard }
    }
}
