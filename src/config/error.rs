//! Error types for configuration loading.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use ortho_config::OrthoError;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading the layered configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The override file exists but could not be read.
    #[error("failed to read configuration file {path}")]
    #[diagnostic(code(rstdocgen::config::read))]
    Read {
        /// Path of the override file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A configuration layer is not valid YAML.
    #[error("failed to parse configuration from {origin}")]
    #[diagnostic(code(rstdocgen::config::parse))]
    Parse {
        /// Description of the layer.
        origin: String,
        /// Underlying YAML error.
        #[source]
        source: serde_saphyr::Error,
    },
    /// A configuration layer is valid YAML but not a mapping of options.
    #[error("configuration from {origin} must be a mapping of option names to values")]
    #[diagnostic(code(rstdocgen::config::not_a_mapping))]
    NotAMapping {
        /// Description of the layer.
        origin: String,
    },
    /// Layer composition failed, typically because of a missing or mistyped
    /// key.
    #[error("failed to merge configuration layers")]
    #[diagnostic(code(rstdocgen::config::merge))]
    Merge {
        /// Underlying merge failure.
        #[source]
        source: Arc<OrthoError>,
    },
    /// `file_encoding` names something other than UTF-8.
    #[error("unsupported file_encoding '{encoding}'")]
    #[diagnostic(
        code(rstdocgen::config::encoding),
        help("only utf-8 is supported; set file_encoding: utf-8")
    )]
    UnsupportedEncoding {
        /// The configured encoding.
        encoding: String,
    },
    /// `id_sep` is empty, so IDs cannot be split into parts.
    #[error("id_sep must not be empty")]
    #[diagnostic(code(rstdocgen::config::id_sep))]
    EmptySeparator,
}
