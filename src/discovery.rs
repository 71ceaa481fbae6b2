//! Source file discovery for `--file-glob`.
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while expanding the source glob.
#[derive(Debug, Error, Diagnostic)]
pub enum DiscoveryError {
    /// The configured pattern is not a valid glob.
    #[error("invalid glob pattern '{pattern}'")]
    #[diagnostic(code(rstdocgen::discovery::pattern))]
    Pattern {
        /// The full pattern that failed to compile.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
    /// A directory could not be read during expansion.
    #[error("glob failed for '{pattern}'")]
    #[diagnostic(code(rstdocgen::discovery::io))]
    Walk {
        /// The pattern being expanded.
        pattern: String,
        /// Underlying traversal error.
        #[source]
        source: glob::GlobError,
    },
}

/// List the regular files under `source_path` matching `file_glob`.
///
/// The source path is matched literally, so folder names containing glob
/// metacharacters are safe. Results are sorted; an empty list is not an
/// error.
///
/// # Errors
///
/// Returns a [`DiscoveryError`] when the pattern is invalid or a directory
/// cannot be read.
pub fn source_files(source_path: &Path, file_glob: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let root = glob::Pattern::escape(&source_path.to_string_lossy());
    let pattern = if root.is_empty() {
        file_glob.to_owned()
    } else {
        format!("{}/{file_glob}", root.trim_end_matches(['/', '\\']))
    };
    let entries = glob::glob(&pattern).map_err(|source| DiscoveryError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| DiscoveryError::Walk {
            pattern: pattern.clone(),
            source,
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        debug!(%pattern, "no source files matched");
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use std::fs;

    #[test]
    fn finds_nested_yaml_files_in_order() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("performance"))?;
        fs::create_dir_all(root.join("setup"))?;
        fs::create_dir_all(root.join("dir.yaml"))?;
        fs::write(root.join("performance/PT-001.2-b.yaml"), "")?;
        fs::write(root.join("performance/PT-001.1-a.yaml"), "")?;
        fs::write(root.join("setup/SU-001.1-a.yaml"), "")?;
        fs::write(root.join("setup/notes.txt"), "")?;

        let files = source_files(root, "**/*.yaml")?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.strip_prefix(root).ok())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        ensure!(
            names
                == [
                    "performance/PT-001.1-a.yaml",
                    "performance/PT-001.2-b.yaml",
                    "setup/SU-001.1-a.yaml",
                ],
            "unexpected files {names:?}"
        );
        Ok(())
    }

    #[test]
    fn no_matches_is_empty() -> Result<()> {
        let temp = tempfile::tempdir()?;
        ensure!(source_files(temp.path(), "*.yaml")?.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_reported() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let err = source_files(temp.path(), "[*.yaml").expect_err("invalid pattern");
        ensure!(matches!(err, DiscoveryError::Pattern { .. }), "{err:?}");
        Ok(())
    }

    #[test]
    fn root_metacharacters_match_literally() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("cases [draft]");
        fs::create_dir_all(&root)?;
        fs::write(root.join("PT-001.1-a.yaml"), "")?;
        ensure!(source_files(&root, "*.yaml")?.len() == 1);
        Ok(())
    }
}
