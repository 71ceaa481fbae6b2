//! Scoped overrides of `RSTDOCGEN_*` variables.
//!
//! Setting and removing variables is `unsafe` in Rust 2024; hold an
//! [`EnvLock`](crate::env_lock::EnvLock) for as long as the guard lives.
//!
//! ```rust
//! use test_support::EnvVarGuard;
//! use test_support::env_lock::EnvLock;
//!
//! let _lock = EnvLock::acquire();
//! {
//!     let _guard = EnvVarGuard::set("RSTDOCGEN_ID_SEP", "_");
//!     assert_eq!(std::env::var("RSTDOCGEN_ID_SEP").as_deref(), Ok("_"));
//! }
//! ```

use std::ffi::OsString;

/// Restores a variable to its previous value (or absence) on drop.
#[derive(Debug)]
pub struct EnvVarGuard {
    name: String,
    prev: Option<OsString>,
}

impl EnvVarGuard {
    /// Set `name` to `value` until the guard drops.
    #[must_use]
    pub fn set(name: impl Into<String>, value: &str) -> Self {
        let name = name.into();
        let prev = std::env::var_os(&name);
        // SAFETY: callers hold `EnvLock`.
        unsafe { std::env::set_var(&name, value) };
        Self { name, prev }
    }

    /// Remove `name` until the guard drops.
    #[must_use]
    pub fn remove(name: impl Into<String>) -> Self {
        let name = name.into();
        let prev = std::env::var_os(&name);
        // SAFETY: callers hold `EnvLock`.
        unsafe { std::env::remove_var(&name) };
        Self { name, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: the lock taken for construction is still held.
        unsafe {
            match self.prev.take() {
                Some(prev) => std::env::set_var(&self.name, prev),
                None => std::env::remove_var(&self.name),
            }
        }
    }
}
