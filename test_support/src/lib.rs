//! Test helpers shared by the unit and integration tests.
//!
//! [`env_lock`] and [`EnvVarGuard`] serialise and scope environment changes;
//! [`project::Project`] lays out a scratch project for running the binaries.

pub mod env_lock;
pub mod env_var_guard;
pub mod project;

pub use env_var_guard::EnvVarGuard;
pub use project::Project;
