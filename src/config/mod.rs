//! Layered tool configuration.
//!
//! Each tool ships an embedded default configuration (`data/<tool>.yml`). A
//! project may override any subset of its keys in `.<tool>.yml` in the
//! working directory, and individual keys may be overridden again through
//! `RSTDOCGEN_*` environment variables. Layers are merged with
//! [`ortho_config::MergeComposer`] into a typed [`Config`] which is immutable
//! for the rest of the run.

use ortho_config::figment::{Figment, providers::Env};
use ortho_config::{MergeComposer, OrthoConfig, OrthoMergeExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

mod error;

pub use error::ConfigError;

const ENV_PREFIX: &str = "RSTDOCGEN_";

/// Encodings accepted for `file_encoding`.
const UTF8_NAMES: [&str; 2] = ["utf-8", "utf8"];

/// The command line tool a configuration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// YAML test case generator.
    GenTestCase,
    /// RST test procedure generator.
    GenRstDocs,
}

impl Tool {
    /// Binary name of the tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenTestCase => "gentestcase",
            Self::GenRstDocs => "genrstdocs",
        }
    }

    /// Text of the embedded default configuration.
    #[must_use]
    pub const fn default_config(self) -> &'static str {
        match self {
            Self::GenTestCase => include_str!("../../data/gentestcase.yml"),
            Self::GenRstDocs => include_str!("../../data/genrstdocs.yml"),
        }
    }

    /// File name of the project override, for example `.gentestcase.yml`.
    #[must_use]
    pub fn override_file_name(self) -> String {
        format!(".{}.yml", self.name())
    }
}

/// Options shared by both tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RSTDOCGEN")]
pub struct Config {
    /// Encoding of every file read or written. Only UTF-8 is supported.
    pub file_encoding: String,
    /// Output format of the shared YAML/CSV converter; unused here.
    pub output_format: String,
    /// Field delimiter of the shared CSV converter; unused here.
    pub csv_delimiter: String,
    /// YAML emission mapping indent; unused here.
    pub mapping: u8,
    /// YAML emission sequence indent; unused here.
    pub sequence: u8,
    /// YAML emission sequence dash offset; unused here.
    pub offset: u8,
    /// Root folder for generated files.
    pub output_path: PathBuf,
    /// Root folder searched by `--file-glob`.
    pub source_path: PathBuf,
    /// Glob pattern, relative to `source_path`, selecting source files.
    pub file_glob: String,
    /// Folder holding test case templates.
    pub template_path: PathBuf,
    /// Template file name inside `template_path`.
    pub template_file: String,
    /// Separator between the parts of a test case ID, usually `-`.
    pub id_sep: String,
    /// RST text inserted to force a page break.
    pub page_break: String,
    /// Folder holding the STD include files.
    pub include_path: PathBuf,
}

impl Config {
    /// Full path of the configured template.
    #[must_use]
    pub fn template(&self) -> PathBuf {
        self.template_path.join(&self.template_file)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let encoding = self.file_encoding.trim().to_ascii_lowercase();
        if !UTF8_NAMES.contains(&encoding.as_str()) {
            return Err(ConfigError::UnsupportedEncoding {
                encoding: self.file_encoding,
            });
        }
        if self.id_sep.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        Ok(self)
    }
}

/// Where the active configuration text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The defaults compiled into the tool.
    Embedded(&'static str),
    /// A project override file.
    File {
        /// Path of the override file.
        path: PathBuf,
        /// Text read from the file.
        text: String,
    },
}

impl ConfigSource {
    /// The configuration text as written, for `--dump-config` and
    /// `--save-config`.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Embedded(text) => text,
            Self::File { text, .. } => text,
        }
    }
}

/// A merged configuration together with its active source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// The merged, validated options.
    pub config: Config,
    /// The most specific configuration file that took part in the merge.
    pub source: ConfigSource,
}

fn parse_layer(text: &str, origin: &str) -> Result<serde_json::Value, ConfigError> {
    if text.lines().all(|line| line.trim().is_empty() || line.trim_start().starts_with('#')) {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    let value: serde_json::Value =
        serde_saphyr::from_str(text).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source,
        })?;
    match value {
        serde_json::Value::Object(_) => Ok(value),
        serde_json::Value::Null => Ok(serde_json::Value::Object(serde_json::Map::new())),
        _ => Err(ConfigError::NotAMapping {
            origin: origin.to_owned(),
        }),
    }
}

fn read_override(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse the embedded defaults of `tool` without consulting any override.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the embedded defaults are incomplete or
/// invalid.
pub fn defaults(tool: Tool) -> Result<Config, ConfigError> {
    let config: Config =
        serde_saphyr::from_str(tool.default_config()).map_err(|source| ConfigError::Parse {
            origin: "embedded defaults".to_owned(),
            source,
        })?;
    config.validate()
}

/// Load the configuration for `tool` from the project rooted at `dir`.
///
/// # Errors
///
/// Returns a [`ConfigError`] when a layer cannot be read or parsed, when the
/// merged layers do not form a complete configuration, or when a value is
/// unsupported.
pub fn load(tool: Tool, dir: &Path) -> Result<LoadedConfig, ConfigError> {
    let mut composer = MergeComposer::new();
    composer.push_defaults(parse_layer(tool.default_config(), "embedded defaults")?);

    let override_path = dir.join(tool.override_file_name());
    let source = match read_override(&override_path)? {
        Some(text) => {
            debug!(path = %override_path.display(), "applying configuration override");
            composer.push_file(parse_layer(&text, &override_path.display().to_string())?, None);
            ConfigSource::File {
                path: override_path,
                text,
            }
        }
        None => ConfigSource::Embedded(tool.default_config()),
    };

    let env = Figment::from(Env::prefixed(ENV_PREFIX))
        .extract::<serde_json::Value>()
        .into_ortho_merge()
        .map_err(|source| ConfigError::Merge { source })?;
    composer.push_environment(env);

    let config = Config::merge_from_layers(composer.layers())
        .map_err(|source| ConfigError::Merge { source })?
        .validate()?;
    Ok(LoadedConfig { config, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serial_test::serial;
    use test_support::{EnvVarGuard, env_lock::EnvLock};

    #[rstest]
    #[case(Tool::GenTestCase, "tests")]
    #[case(Tool::GenRstDocs, "std/tests")]
    #[serial]
    fn embedded_defaults_load(#[case] tool: Tool, #[case] output: &str) -> Result<()> {
        let _lock = EnvLock::acquire();
        let dir = tempfile::tempdir()?;
        let loaded = load(tool, dir.path())?;
        ensure!(loaded.config.output_path == Path::new(output));
        ensure!(loaded.config.id_sep == "-");
        ensure!(loaded.source == ConfigSource::Embedded(tool.default_config()));
        Ok(())
    }

    #[test]
    #[serial]
    fn override_file_replaces_only_named_keys() -> Result<()> {
        let _lock = EnvLock::acquire();
        let dir = tempfile::tempdir()?;
        let text = "output_path: out\nid_sep: _\n";
        fs::write(dir.path().join(".gentestcase.yml"), text)?;
        let loaded = load(Tool::GenTestCase, dir.path())?;
        ensure!(loaded.config.output_path == Path::new("out"));
        ensure!(loaded.config.id_sep == "_");
        ensure!(loaded.config.template_file == "testcase.yaml.j2");
        ensure!(loaded.source.text() == text);
        Ok(())
    }

    #[test]
    #[serial]
    fn environment_overrides_file() -> Result<()> {
        let _lock = EnvLock::acquire();
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(".genrstdocs.yml"), "output_path: out\n")?;
        let _guard = EnvVarGuard::set("RSTDOCGEN_OUTPUT_PATH", "from-env");
        let loaded = load(Tool::GenRstDocs, dir.path())?;
        ensure!(loaded.config.output_path == Path::new("from-env"));
        Ok(())
    }

    #[rstest]
    #[case("file_encoding: latin-1\n")]
    #[case("id_sep: ''\n")]
    #[case("- not\n- a mapping\n")]
    #[serial]
    fn invalid_overrides_are_rejected(#[case] text: &str) -> Result<()> {
        let _lock = EnvLock::acquire();
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(".gentestcase.yml"), text)?;
        ensure!(load(Tool::GenTestCase, dir.path()).is_err());
        Ok(())
    }

    #[test]
    #[serial]
    fn comment_only_override_keeps_defaults() -> Result<()> {
        let _lock = EnvLock::acquire();
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(".gentestcase.yml"), "# nothing yet\n\n")?;
        let loaded = load(Tool::GenTestCase, dir.path())?;
        ensure!(loaded.config == defaults(Tool::GenTestCase)?);
        Ok(())
    }

    #[test]
    fn template_joins_path_and_file() -> Result<()> {
        let config = defaults(Tool::GenTestCase)?;
        ensure!(config.template() == Path::new("templates").join("testcase.yaml.j2"));
        ensure!(config.page_break == ".. raw:: pdf\n\n   PageBreak");
        Ok(())
    }
}
