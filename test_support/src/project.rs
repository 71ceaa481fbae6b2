//! Scratch project layout for end-to-end runs of the binaries.
//!
//! The layout mirrors the embedded defaults of both tools: templates in
//! `templates/`, generated cases in `tests/<category>/`, procedures in
//! `std/tests/`, and include files in `std/includes/`.

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Include files seeded by [`Project::new`].
pub const INCLUDE_FILES: [&str; 3] = [
    "test_prep_001.rst",
    "test_desc_001.rst",
    "test_desc_002.rst",
];

/// A temporary project directory.
#[derive(Debug)]
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Create a project with `template` as `templates/testcase.yaml.j2` and
    /// the include files in [`INCLUDE_FILES`], each holding a short heading.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory tree cannot be written.
    pub fn new(template: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("create project dir")?;
        let project = Self { dir };
        project.write("templates/testcase.yaml.j2", template)?;
        for name in INCLUDE_FILES {
            project.write(&format!("std/includes/{name}"), "Included procedures\n")?;
        }
        Ok(project)
    }

    /// Root of the project.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` to `relative`, creating parent folders.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be written.
    pub fn write(&self, relative: &str, text: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Read `relative` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.dir.path().join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// A command for binary `bin` running inside the project, with any
    /// inherited `RSTDOCGEN_*` variables cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be located.
    pub fn command(&self, bin: &str) -> Result<Command> {
        let mut cmd = Command::cargo_bin(bin).with_context(|| format!("locate {bin} binary"))?;
        cmd.current_dir(self.dir.path());
        for (key, _) in std::env::vars_os() {
            if key.to_string_lossy().starts_with("RSTDOCGEN_") {
                cmd.env_remove(key);
            }
        }
        Ok(cmd)
    }
}
