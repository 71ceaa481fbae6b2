//! Command execution for both tools.
//!
//! Each entry point loads the layered configuration from the working
//! directory, honours `--dump-config` and `--save-config`, and otherwise
//! processes its inputs strictly in order. The first failure aborts the run;
//! files written before it stay in place.

use crate::category::PrefixMap;
use crate::cli::{CommonArgs, GenRstDocsCli, GenTestCaseCli, write_help};
use crate::config::{self, Config, LoadedConfig, Tool};
use crate::{discovery, docgen, generator};
use anyhow::Result;
use clap::CommandFactory;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, info};
use tracing_subscriber::fmt;

mod error;

pub use error::RunnerError;

/// How a run ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The requested work was done.
    Completed,
    /// No input was given and no configuration flag applied.
    MissingInput,
}

/// Install the stderr log subscriber: `INFO` by default, `DEBUG` when
/// `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };
    fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}

/// Map the result of a run onto the process exit status.
///
/// Missing input prints the help text of `C` to stderr. Errors are logged
/// with their full context chain.
#[must_use]
pub fn exit_code<C: CommandFactory>(result: Result<Outcome>) -> ExitCode {
    match result {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::MissingInput) => {
            if let Err(err) = write_help::<C>() {
                tracing::error!(error = %err, "failed to print help");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Apply `--dump-config` or `--save-config`. Returns `true` when one of them
/// ran, which ends the invocation.
fn handle_config_flags(tool: Tool, common: &CommonArgs, loaded: &LoadedConfig) -> Result<bool> {
    let text = loaded.source.text();
    if common.dump {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| RunnerError::ConfigOutput {
                target: "stdout".to_owned(),
                source,
            })?;
        return Ok(true);
    }
    if common.save {
        let path = PathBuf::from(tool.override_file_name());
        fs::write(&path, text).map_err(|source| RunnerError::ConfigOutput {
            target: path.display().to_string(),
            source,
        })?;
        info!("Configuration saved to {}", path.display());
        return Ok(true);
    }
    Ok(false)
}

fn prepare_output_root(config: &Config) -> Result<(), RunnerError> {
    fs::create_dir_all(&config.output_path).map_err(|source| RunnerError::OutputRoot {
        path: config.output_path.clone(),
        source,
    })
}

/// Generate one YAML test case per context file in `cli.files`.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded or any context
/// file fails to render, route, or write.
pub fn run_gentestcase(cli: &GenTestCaseCli) -> Result<Outcome> {
    let tool = Tool::GenTestCase;
    let loaded = config::load(tool, Path::new("."))?;
    if handle_config_flags(tool, &cli.common, &loaded)? {
        return Ok(Outcome::Completed);
    }
    if cli.files.is_empty() {
        return Ok(Outcome::MissingInput);
    }

    let config = &loaded.config;
    prepare_output_root(config)?;
    let prefixes = PrefixMap::standard();
    for context in &cli.files {
        debug!(file = %context.display(), "processing context file");
        generator::generate(context, config, &prefixes)?;
    }
    Ok(Outcome::Completed)
}

fn rst_sources(cli: &GenRstDocsCli, config: &Config) -> Result<Option<Vec<PathBuf>>> {
    if cli.glob {
        if let Some(file) = &cli.file {
            debug!(file = %file.display(), "--file-glob given; ignoring positional file");
        }
        let files = discovery::source_files(&config.source_path, &config.file_glob)?;
        debug!(?files, "resolved source files");
        return Ok(Some(files));
    }
    Ok(cli.file.clone().map(|file| vec![file]))
}

/// Render RST procedures for the selected YAML test cases.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded, discovery
/// fails, or any source fails to load, render, or register its include.
pub fn run_genrstdocs(cli: &GenRstDocsCli) -> Result<Outcome> {
    let tool = Tool::GenRstDocs;
    let loaded = config::load(tool, Path::new("."))?;
    if handle_config_flags(tool, &cli.common, &loaded)? {
        return Ok(Outcome::Completed);
    }
    let config = &loaded.config;
    let Some(sources) = rst_sources(cli, config)? else {
        return Ok(Outcome::MissingInput);
    };

    prepare_output_root(config)?;
    for source in &sources {
        debug!(file = %source.display(), "processing test case");
        docgen::write_test_case_doc(source, config)?;
    }
    Ok(Outcome::Completed)
}
