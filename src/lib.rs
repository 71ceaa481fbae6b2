//! Rstdocgen core library.
//!
//! This library backs two command line tools. `gentestcase` renders a YAML
//! test case from a Jinja template and a YAML context file, filing the result
//! under a category folder derived from the test case ID. `genrstdocs` turns
//! such a test case into an RST test procedure (STD style) and registers it in
//! the matching include file.

pub mod category;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod docgen;
pub mod generator;
pub mod include;
pub mod rst;
pub mod runner;
pub mod testcase;
