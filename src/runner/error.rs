//! Error types for the runner module.

// The unused_assignments lint fires on miette/thiserror derive expansion in
// some Rust versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing a run.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The active configuration could not be written to stdout or a file.
    #[error("failed to write configuration to {target}")]
    #[diagnostic(code(rstdocgen::runner::config_output))]
    ConfigOutput {
        /// `stdout` or the override file path.
        target: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configured output folder could not be created.
    #[error("failed to create output folder {path}")]
    #[diagnostic(
        code(rstdocgen::runner::output_root),
        help("check `output_path` in the configuration")
    )]
    OutputRoot {
        /// The configured output folder.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
