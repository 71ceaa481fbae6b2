//! Diagnostics for YAML documents read by the tools.
//!
//! Test cases, context files, and rendered templates are loaded in two
//! passes. A failure in the first (syntax) pass becomes a
//! [`syntax_error`]; a document that parses but has the wrong shape becomes
//! a [`structure_error`]. Both point at the reported location and append a
//! hint for the usual hand-editing mistakes to the message, so the hint
//! survives plain-text logging.

use std::fmt;

mod hints;
mod yaml;

pub use yaml::{structure_error, syntax_error};

/// Label naming the origin of a YAML document, usually its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceName(String);

impl SourceName {
    /// Label a document.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The label text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SourceName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
