//! Registration of generated test procedures in the STD include files.
//!
//! The STD document pulls test procedures in through per-section include
//! files: setup cases go to `test_prep_<section>.rst`, performance and
//! security cases to `test_desc_<section>.rst`. The section is read from the
//! dotted number of the test case ID.
//!
//! Appending is idempotent per file name. The read-check-append sequence runs
//! under an exclusive advisory lock on the include file, so concurrent runs
//! targeting the same include file do not lose updates.

use crate::config::Config;
use crate::rst::Include;
use miette::Diagnostic;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Folder, relative to the include files, holding the rendered procedures.
const PROCEDURE_DIR: &str = "../tests";

/// Errors raised while registering an include.
#[derive(Debug, Error, Diagnostic)]
pub enum IncludeError {
    /// The file name does not contain a category and a dotted number.
    #[error("cannot derive an include file from '{name}'")]
    #[diagnostic(
        code(rstdocgen::include::malformed_name),
        help("expected a name such as PT{sep}001.1{sep}load.rst")
    )]
    MalformedName {
        /// The offending file name.
        name: String,
        /// The configured ID separator.
        sep: String,
    },
    /// The category token has no include file.
    #[error("no include file for test category '{category}' in '{name}'")]
    #[diagnostic(code(rstdocgen::include::unknown_category))]
    UnknownCategory {
        /// The category token.
        category: String,
        /// The offending file name.
        name: String,
    },
    /// The include file could not be opened, read, locked, or written.
    #[error("failed to update include file {path}")]
    #[diagnostic(code(rstdocgen::include::io))]
    Io {
        /// Path of the include file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Kind of include file a test procedure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// Test preparations (`SU` cases).
    Preparation,
    /// Test descriptions (`PT` and `ST` cases).
    Description,
}

impl IncludeKind {
    const fn stem(self) -> &'static str {
        match self {
            Self::Preparation => "test_prep",
            Self::Description => "test_desc",
        }
    }
}

/// The include file selected for a test procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeTarget {
    /// Include file kind.
    pub kind: IncludeKind,
    /// Section number taken from the test case ID.
    pub section: String,
}

impl IncludeTarget {
    /// Derive the include target from a procedure file name.
    ///
    /// The name is split on `id_sep` into a category token and a dotted
    /// number. The section is the second dotted component of a
    /// `chapter.section.case` number and the first component otherwise.
    ///
    /// ```rust
    /// use rstdocgen::include::{IncludeKind, IncludeTarget};
    ///
    /// let target = IncludeTarget::from_file_name("PT-001.1-load.rst", "-").unwrap();
    /// assert_eq!(target.kind, IncludeKind::Description);
    /// assert_eq!(target.file_name(), "test_desc_001.rst");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`IncludeError::MalformedName`] when the name lacks a dotted
    /// number and [`IncludeError::UnknownCategory`] for categories other than
    /// `SU`, `PT`, and `ST`.
    pub fn from_file_name(name: &str, id_sep: &str) -> Result<Self, IncludeError> {
        let malformed = || IncludeError::MalformedName {
            name: name.to_owned(),
            sep: id_sep.to_owned(),
        };
        let mut parts = name.splitn(3, id_sep);
        let category = parts.next().unwrap_or_default();
        let number = parts.next().ok_or_else(malformed)?;
        debug!(category, number, "splitting test case name");

        let components: Vec<&str> = number.split('.').collect();
        let section = match components.as_slice() {
            [_, section, _, ..] | [section, ..] => *section,
            [] => "",
        };
        if section.is_empty() {
            return Err(malformed());
        }

        let kind = match category {
            "SU" => IncludeKind::Preparation,
            "PT" | "ST" => IncludeKind::Description,
            _ => {
                return Err(IncludeError::UnknownCategory {
                    category: category.to_owned(),
                    name: name.to_owned(),
                });
            }
        };
        Ok(Self {
            kind,
            section: section.to_owned(),
        })
    }

    /// File name of the include file, for example `test_desc_001.rst`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}.rst", self.kind.stem(), self.section)
    }
}

/// Text appended to an include file to pull in `procedure_name`.
#[must_use]
pub fn include_snippet(procedure_name: &str, page_break: &str) -> String {
    let include = Include::new(format!("{PROCEDURE_DIR}/{procedure_name}"));
    format!("\n{include}\n\n{page_break}\n")
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> IncludeError + '_ {
    move |source| IncludeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Append an include for `procedure_name` to its include file under
/// `include_root`, unless the file already references it.
///
/// Returns the include file path and whether it was modified.
///
/// # Errors
///
/// Returns an [`IncludeError`] when no include file can be derived from the
/// name or when the include file is missing or cannot be updated.
pub fn append_include(
    include_root: &Path,
    procedure_name: &str,
    config: &Config,
) -> Result<(PathBuf, bool), IncludeError> {
    let target = IncludeTarget::from_file_name(procedure_name, &config.id_sep)?;
    let path = include_root.join(target.file_name());
    debug!(path = %path.display(), "include file for writing");

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .map_err(io_error(&path))?;
    file.lock().map_err(io_error(&path))?;
    let appended = append_locked(&mut file, procedure_name, &config.page_break)
        .map_err(io_error(&path))?;
    file.unlock().map_err(io_error(&path))?;

    if appended {
        info!("New include written to {}", path.display());
    }
    Ok((path, appended))
}

fn append_locked(file: &mut File, procedure_name: &str, page_break: &str) -> io::Result<bool> {
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    if text.contains(procedure_name) {
        return Ok(false);
    }
    file.seek(SeekFrom::End(0))?;
    file.write_all(include_snippet(procedure_name, page_break).as_bytes())?;
    file.flush()?;
    Ok(true)
}
