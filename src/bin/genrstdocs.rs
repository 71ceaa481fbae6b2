//! `genrstdocs`: render RST test procedures from YAML test cases.
//!
//! Parses the command line and delegates to [`runner::run_genrstdocs`].

use clap::Parser;
use rstdocgen::cli::GenRstDocsCli;
use rstdocgen::runner;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = GenRstDocsCli::parse();
    runner::init_tracing(cli.common.verbose);
    runner::exit_code::<GenRstDocsCli>(runner::run_genrstdocs(&cli))
}
