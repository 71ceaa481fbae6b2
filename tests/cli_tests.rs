//! Command line behaviour of both binaries: missing input, version, and the
//! configuration dump/save flags.

use anyhow::Result;
use predicates::prelude::*;
use rstest::rstest;
use test_support::Project;

const TEMPLATE: &str = include_str!("../templates/testcase.yaml.j2");

#[rstest]
#[case("gentestcase", &[])]
#[case("genrstdocs", &[])]
#[case("genrstdocs", &["-v"])]
fn missing_input_prints_help_and_fails(#[case] bin: &str, #[case] args: &[&str]) -> Result<()> {
    let project = Project::new(TEMPLATE)?;
    project
        .command(bin)?
        .args(args)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:"));
    Ok(())
}

#[rstest]
#[case("gentestcase")]
#[case("genrstdocs")]
fn version_is_reported(#[case] bin: &str) -> Result<()> {
    let project = Project::new(TEMPLATE)?;
    project
        .command(bin)?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[rstest]
#[case("gentestcase", include_str!("../data/gentestcase.yml"))]
#[case("genrstdocs", include_str!("../data/genrstdocs.yml"))]
fn dump_config_prints_embedded_defaults(#[case] bin: &str, #[case] defaults: &str) -> Result<()> {
    let project = Project::new(TEMPLATE)?;
    project
        .command(bin)?
        .arg("--dump-config")
        .assert()
        .success()
        .stdout(predicate::eq(defaults));
    Ok(())
}

#[test]
fn dump_config_prefers_the_override_file() -> Result<()> {
    let project = Project::new(TEMPLATE)?;
    let text = "output_path: generated\n";
    project.write(".gentestcase.yml", text)?;
    project
        .command("gentestcase")?
        .arg("-d")
        .assert()
        .success()
        .stdout(predicate::eq(text));
    Ok(())
}

#[test]
fn save_config_writes_the_override_file() -> Result<()> {
    let project = Project::new(TEMPLATE)?;
    project
        .command("genrstdocs")?
        .arg("--save-config")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(
        project.read(".genrstdocs.yml")?,
        include_str!("../data/genrstdocs.yml")
    );
    assert!(
        !project.path().join("std/tests").exists(),
        "saving the configuration must not process anything"
    );
    Ok(())
}

#[test]
fn invalid_override_is_fatal() -> Result<()> {
    let project = Project::new(TEMPLATE)?;
    project.write(".gentestcase.yml", "file_encoding: latin-1\n")?;
    project
        .command("gentestcase")?
        .arg("-d")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("latin-1"));
    Ok(())
}
