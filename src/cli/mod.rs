//! Command line interface definitions using clap.
//!
//! Both tools share [`CommonArgs`]; each adds its own input arguments. Input
//! is optional at the clap level because `--dump-config` and `--save-config`
//! run without it; the runner reports missing input instead.

use clap::{Args, CommandFactory, Parser};
use std::io;
use std::path::PathBuf;

/// Flags shared by both tools.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct CommonArgs {
    /// Display more processing info.
    #[arg(short, long)]
    pub verbose: bool,

    /// Dump the active configuration file to stdout and exit.
    #[arg(short = 'd', long = "dump-config")]
    pub dump: bool,

    /// Save the active configuration to the default override file and exit.
    #[arg(short = 's', long = "save-config")]
    pub save: bool,
}

/// Turn YAML context data into DID-like test description metadata.
///
/// Each context file is rendered through the configured template; the result
/// is written to `<output_path>/<category>/<id>-<context>.yaml`.
#[derive(Debug, Clone, Parser, PartialEq, Eq)]
#[command(name = "gentestcase", version, about, long_about)]
pub struct GenTestCaseCli {
    /// Shared flags.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Context file(s) to process.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Generate RST test case doc(s) from YAML source.
///
/// Either provide a single source file as the last argument or use
/// `--file-glob` to search under the `source_path` configured for the tool.
#[derive(Debug, Clone, Parser, PartialEq, Eq)]
#[command(name = "genrstdocs", version, about, long_about)]
pub struct GenRstDocsCli {
    /// Shared flags.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Find all source files via the configured glob.
    #[arg(short = 'f', long = "file-glob")]
    pub glob: bool,

    /// Name of a single source file.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Write the help text of `C` to stderr.
///
/// # Errors
///
/// Returns an error if stderr cannot be written.
pub fn write_help<C: CommandFactory>() -> io::Result<()> {
    C::command().write_help(&mut io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn gentestcase_cli_is_consistent() {
        GenTestCaseCli::command().debug_assert();
    }

    #[test]
    fn genrstdocs_cli_is_consistent() {
        GenRstDocsCli::command().debug_assert();
    }

    #[rstest]
    #[case(&["gentestcase"], 0, false)]
    #[case(&["gentestcase", "-v", "a.yaml", "b.yaml"], 2, true)]
    #[case(&["gentestcase", "--verbose", "a.yaml"], 1, true)]
    fn gentestcase_accepts_many_files(
        #[case] argv: &[&str],
        #[case] files: usize,
        #[case] verbose: bool,
    ) {
        let cli = GenTestCaseCli::try_parse_from(argv).expect("parse");
        assert_eq!(cli.files.len(), files);
        assert_eq!(cli.common.verbose, verbose);
    }

    #[rstest]
    #[case(&["genrstdocs", "-d"], CommonArgs { dump: true, ..CommonArgs::default() })]
    #[case(&["genrstdocs", "--save-config"], CommonArgs { save: true, ..CommonArgs::default() })]
    fn config_flags(#[case] argv: &[&str], #[case] expected: CommonArgs) {
        let cli = GenRstDocsCli::try_parse_from(argv).expect("parse");
        assert_eq!(cli.common, expected);
    }

    #[test]
    fn genrstdocs_takes_glob_flag_and_one_file() {
        let cli = GenRstDocsCli::try_parse_from(["genrstdocs", "-f"]).expect("parse");
        assert!(cli.glob);
        assert!(cli.file.is_none());

        let cli = GenRstDocsCli::try_parse_from(["genrstdocs", "tests/PT-001.1-load.yaml"])
            .expect("parse");
        assert_eq!(cli.file, Some(PathBuf::from("tests/PT-001.1-load.yaml")));

        assert!(GenRstDocsCli::try_parse_from(["genrstdocs", "a.yaml", "b.yaml"]).is_err());
    }
}
