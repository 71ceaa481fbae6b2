//! RST test procedure assembly.
//!
//! Turns a [`TestCase`] into a document shaped after section 4.x.y of the STD
//! DID: title, metadata fields, traced requirements, the four descriptive
//! text blocks, and the procedure table.

use crate::config::Config;
use crate::include::append_include;
use crate::rst::{FieldList, Header, ListTable};
use crate::testcase::{Step, StepLabel, TestCase};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Header level of the test case title.
const TITLE_LEVEL: usize = 2;
/// Header level of the sections inside a test case.
const SECTION_LEVEL: usize = 4;
/// Cell text standing in for an empty expected result.
pub const EMPTY_RESULT: &str = "|";
/// Column headings of the procedure table.
pub const STEP_COLUMNS: [&str; 3] = ["Step", "Action", "Expected Result"];
const STEP_WIDTHS: [u16; 3] = [6, 44, 22];
const STEP_TABLE_TITLE: &str = "Steps and Notes";

/// Compute the `Step` column for each procedure row.
///
/// Marker rows (`note`, `verif`) keep their literal label and do not advance
/// the counter; every other row is numbered consecutively from 1.
///
/// ```rust
/// use rstdocgen::docgen::number_steps;
/// use rstdocgen::testcase::{Step, StepLabel};
///
/// let step = |label: StepLabel| Step {
///     label,
///     action: String::new(),
///     expected_result: String::new(),
/// };
/// let steps = [
///     step(StepLabel::Number(1)),
///     step(StepLabel::Text("Note".into())),
///     step(StepLabel::Number(7)),
/// ];
/// assert_eq!(number_steps(&steps), ["1", "Note", "2"]);
/// ```
#[must_use]
pub fn number_steps(steps: &[Step]) -> Vec<String> {
    let mut next = 1usize;
    steps
        .iter()
        .map(|step| match &step.label {
            StepLabel::Text(text) if step.label.is_marker() => text.clone(),
            _ => {
                let number = next.to_string();
                next += 1;
                number
            }
        })
        .collect()
}

fn steps_table(steps: &[Step]) -> ListTable {
    let mut table = ListTable::new(STEP_TABLE_TITLE)
        .header_rows(1)
        .widths(STEP_WIDTHS)
        .row(STEP_COLUMNS);
    for (label, step) in number_steps(steps).into_iter().zip(steps) {
        let result = if step.expected_result.trim().is_empty() {
            EMPTY_RESULT.to_owned()
        } else {
            step.expected_result.clone()
        };
        table.push_row([label, step.action.clone(), result]);
    }
    table
}

fn requirements_chunk(case: &TestCase) -> Vec<String> {
    let Some(reqs) = &case.reqs else {
        return vec!["Requirements: None".to_owned()];
    };
    let header = Header::new(format!("Requirements for {}", case.title), SECTION_LEVEL);
    let mut fields = FieldList::new();
    for req in reqs {
        fields.push(&req.id, &req.method);
    }
    let mut chunks = vec![header.to_string()];
    if !fields.is_empty() {
        chunks.push(fields.to_string());
    }
    chunks
}

fn procedures_header(case: &TestCase, page_break: &str) -> String {
    if case.is_analysis() {
        Header::new(format!("Analysis procedures for {}", case.title), SECTION_LEVEL).to_string()
    } else {
        let header = Header::new(format!("Procedures for {}", case.title), SECTION_LEVEL);
        format!("{page_break}\n\n{header}")
    }
}

/// Render a test case as an RST document.
///
/// Chunks are separated by one blank line and the document ends with a
/// newline.
#[must_use]
pub fn render_test_case(case: &TestCase, config: &Config) -> String {
    let mut chunks = vec![Header::new(&case.title, TITLE_LEVEL).to_string()];
    chunks.push(
        FieldList::new()
            .field("ID", &case.id)
            .field("Title", &case.title)
            .field("Purpose", &case.purpose)
            .field("Description", &case.description)
            .to_string(),
    );
    chunks.extend(requirements_chunk(case));

    let blocks = [
        ("Prerequisites", &case.prereqs),
        ("Inputs", &case.inputs),
        ("Expected Results", &case.expected_results),
        ("Assumptions and Constraints", &case.assumptions_constraints),
    ];
    for (section, text) in blocks {
        chunks.push(Header::new(format!("{section} for {}", case.title), SECTION_LEVEL).to_string());
        chunks.push(text.clone());
    }

    chunks.push(procedures_header(case, &config.page_break));
    chunks.push(steps_table(&case.steps).to_string());

    let mut doc = chunks
        .iter()
        .map(|chunk| chunk.trim_end())
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    doc.push('\n');
    doc
}

/// File name of the procedure rendered from `source`: its stem plus `.rst`.
///
/// # Errors
///
/// Returns an error when `source` has no UTF-8 file stem.
pub fn output_name(source: &Path) -> Result<String> {
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("{} has no usable file name", source.display()))?;
    Ok(format!("{stem}.rst"))
}

/// Render `source` into `output_path` and register it in its include file.
///
/// Returns the path of the written procedure.
///
/// # Errors
///
/// Returns an error when the source cannot be loaded, the procedure cannot
/// be written, or the include file cannot be updated.
pub fn write_test_case_doc(source: &Path, config: &Config) -> Result<PathBuf> {
    let case = TestCase::from_path(source)?;
    info!("Got test data for {}", case.id);
    let doc = render_test_case(&case, config);

    let out_name = output_name(source)?;
    let out_file = config.output_path.join(&out_name);
    fs::write(&out_file, doc).with_context(|| format!("write {}", out_file.display()))?;
    info!("New testcase written to {}", out_file.display());

    append_include(&config.include_path, &out_name, config)?;
    Ok(out_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Tool, defaults};
    use crate::testcase::Requirement;
    use anyhow::ensure;
    use rstest::{fixture, rstest};

    fn step(label: StepLabel, action: &str, result: &str) -> Step {
        Step {
            label,
            action: action.to_owned(),
            expected_result: result.to_owned(),
        }
    }

    #[fixture]
    fn config() -> Config {
        defaults(Tool::GenRstDocs).expect("embedded defaults")
    }

    #[fixture]
    fn case() -> TestCase {
        TestCase {
            id: "PT-001.1".into(),
            title: "Load test".into(),
            purpose: "Verify throughput.".into(),
            description: "Drive the service.".into(),
            prereqs: "Service deployed.\n".into(),
            inputs: "Load profile.".into(),
            expected_results: "Throughput above target.".into(),
            assumptions_constraints: "None.".into(),
            reqs: Some(vec![Requirement {
                id: "SRS-042".into(),
                method: "T".into(),
            }]),
            steps: vec![
                step(StepLabel::Number(1), "Start.", "Started."),
                step(StepLabel::Text("note".into()), "Record time.", ""),
                step(StepLabel::Number(2), "Stop.", "Stopped."),
            ],
        }
    }

    #[test]
    fn marker_rows_do_not_advance_the_counter() {
        let steps = [
            step(StepLabel::Number(1), "a", "x"),
            step(StepLabel::Text("Note".into()), "b", ""),
            step(StepLabel::Number(3), "c", "x"),
            step(StepLabel::Text("setup".into()), "d", "x"),
            step(StepLabel::Text("VERIF".into()), "e", ""),
        ];
        assert_eq!(number_steps(&steps), ["1", "Note", "2", "3", "VERIF"]);
    }

    #[rstest]
    fn renders_the_full_document(case: TestCase, config: Config) {
        let expected = concat!(
            "Load test\n",
            "---------\n",
            "\n",
            ":ID: PT-001.1\n",
            ":Title: Load test\n",
            ":Purpose: Verify throughput.\n",
            ":Description: Drive the service.\n",
            "\n",
            "Requirements for Load test\n",
            "++++++++++++++++++++++++++\n",
            "\n",
            ":SRS-042: T\n",
            "\n",
            "Prerequisites for Load test\n",
            "+++++++++++++++++++++++++++\n",
            "\n",
            "Service deployed.\n",
            "\n",
            "Inputs for Load test\n",
            "++++++++++++++++++++\n",
            "\n",
            "Load profile.\n",
            "\n",
            "Expected Results for Load test\n",
            "++++++++++++++++++++++++++++++\n",
            "\n",
            "Throughput above target.\n",
            "\n",
            "Assumptions and Constraints for Load test\n",
            "+++++++++++++++++++++++++++++++++++++++++\n",
            "\n",
            "None.\n",
            "\n",
            ".. raw:: pdf\n",
            "\n",
            "   PageBreak\n",
            "\n",
            "Procedures for Load test\n",
            "++++++++++++++++++++++++\n",
            "\n",
            ".. list-table:: Steps and Notes\n",
            "   :widths: 6 44 22\n",
            "   :header-rows: 1\n",
            "\n",
            "   * - Step\n",
            "     - Action\n",
            "     - Expected Result\n",
            "   * - 1\n",
            "     - Start.\n",
            "     - Started.\n",
            "   * - note\n",
            "     - Record time.\n",
            "     - |\n",
            "   * - 2\n",
            "     - Stop.\n",
            "     - Stopped.\n",
        );
        assert_eq!(render_test_case(&case, &config), expected);
    }

    #[rstest]
    fn analysis_requirements_switch_the_procedure_header(
        mut case: TestCase,
        config: Config,
    ) -> Result<()> {
        case.reqs = Some(vec![
            Requirement {
                id: "SRS-001".into(),
                method: "T".into(),
            },
            Requirement {
                id: "SRS-002".into(),
                method: "A".into(),
            },
        ]);
        let doc = render_test_case(&case, &config);
        ensure!(doc.contains("\nAnalysis procedures for Load test\n"));
        ensure!(!doc.contains("PageBreak"), "analysis procedures skip the page break");
        ensure!(!doc.contains("\nProcedures for"), "plain header must not appear");
        Ok(())
    }

    #[rstest]
    fn missing_requirements_render_none(mut case: TestCase, config: Config) -> Result<()> {
        case.reqs = None;
        let doc = render_test_case(&case, &config);
        ensure!(doc.contains("\n\nRequirements: None\n\n"));
        ensure!(!doc.contains("Requirements for"));
        Ok(())
    }

    #[rstest]
    fn document_has_one_title_and_one_row_per_step(case: TestCase, config: Config) -> Result<()> {
        let doc = render_test_case(&case, &config);
        let title_headers = doc.matches("Load test\n---------\n").count();
        ensure!(title_headers == 1, "expected one title header, found {title_headers}");
        ensure!(doc.matches(":ID: ").count() == 1, "expected one metadata block");
        let rows = doc.lines().filter(|line| line.starts_with("   * - ")).count();
        ensure!(rows == case.steps.len() + 1, "expected {} rows, found {rows}", case.steps.len() + 1);
        Ok(())
    }

    #[rstest]
    fn empty_expected_results_become_placeholders(mut case: TestCase, config: Config) -> Result<()> {
        case.steps = vec![step(StepLabel::Number(1), "Only action.", "  ")];
        let doc = render_test_case(&case, &config);
        ensure!(doc.ends_with("   * - 1\n     - Only action.\n     - |\n"), "{doc}");
        Ok(())
    }

    #[rstest]
    fn blank_yaml_cells_render_as_placeholders(config: Config) -> Result<()> {
        let yaml = concat!(
            "id: PT-001.1\n",
            "title: Load test\n",
            "prereqs:\n",
            "reqs:\n",
            "steps:\n",
            "  - Step: 1\n",
            "    Action: Start.\n",
            "    Expected Result:\n",
        );
        let case = TestCase::from_str_named(yaml, &"case.yaml".into())?;
        let doc = render_test_case(&case, &config);
        ensure!(doc.ends_with("   * - 1\n     - Start.\n     - |\n"), "{doc}");
        ensure!(!doc.contains('~') && !doc.contains("null"), "{doc}");
        ensure!(
            doc.contains("Prerequisites for Load test\n+++++++++++++++++++++++++++\n\nInputs for"),
            "blank text block should leave only its header:\n{doc}"
        );
        ensure!(doc.contains("\n\nRequirements: None\n\n"), "{doc}");
        Ok(())
    }

    #[rstest]
    #[case("tests/performance/PT-001.1-load.yaml", "PT-001.1-load.rst")]
    #[case("SU-002.1-boot.yml", "SU-002.1-boot.rst")]
    fn output_name_uses_the_source_stem(#[case] source: &str, #[case] expected: &str) -> Result<()> {
        ensure!(output_name(Path::new(source))? == expected);
        Ok(())
    }
}
