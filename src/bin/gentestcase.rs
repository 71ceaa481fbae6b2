//! `gentestcase`: render YAML test cases from context files.
//!
//! Parses the command line and delegates to [`runner::run_gentestcase`].

use clap::Parser;
use rstdocgen::cli::GenTestCaseCli;
use rstdocgen::runner;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = GenTestCaseCli::parse();
    runner::init_tracing(cli.common.verbose);
    runner::exit_code::<GenTestCaseCli>(runner::run_gentestcase(&cli))
}
