//! Typed test case records.
//!
//! A test case YAML file (the shape `gentestcase` emits) is parsed in two
//! passes: the YAML syntax first, with spans for diagnostics, then the
//! structure, so that a missing field or a malformed step row fails at load
//! time with the file and field named.
//!
//! ```yaml
//! id: PT-001.1
//! title: Load test
//! purpose: Verify throughput.
//! description: Drive the service at peak load.
//! prereqs: Service deployed.
//! inputs: Load profile.
//! expected_results: Throughput above target.
//! assumptions_constraints: None.
//! reqs:
//!   - id: SRS-042
//!     method: T
//! steps:
//!   - Step: 1
//!     Action: Start the load generator.
//!     Expected Result: Requests are accepted.
//!   - Step: Note
//!     Action: Record the start time.
//!     Expected Result: ""
//! ```

use crate::diagnostics::{SourceName, structure_error, syntax_error};
use miette::Diagnostic;
use serde::Deserialize;
use serde::de::{self, Deserializer, Error as _, Visitor};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Method code marking a requirement that is verified by analysis.
pub const ANALYSIS_METHOD: &str = "A";

/// Step labels that mark a remark row rather than a numbered action.
const MARKER_LABELS: [&str; 2] = ["note", "verif"];

/// Errors raised while loading a test case.
#[derive(Debug, Error, Diagnostic)]
pub enum TestCaseError {
    /// The file could not be read.
    #[error("failed to read test case {path}")]
    #[diagnostic(code(rstdocgen::testcase::read))]
    Read {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The YAML is malformed or does not describe a test case.
    #[error("invalid test case {name}")]
    #[diagnostic(code(rstdocgen::testcase::invalid))]
    Invalid {
        /// Label of the offending document.
        name: SourceName,
        /// Syntax or structure diagnostic.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
}

/// A requirement verified by a test case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Requirement {
    /// Requirement identifier, for example `SRS-042`.
    #[serde(deserialize_with = "text")]
    pub id: String,
    /// Verification method code (`A`nalysis, `T`est, `D`emonstration, ...).
    #[serde(deserialize_with = "text")]
    pub method: String,
}

impl Requirement {
    /// Whether the requirement is verified by analysis.
    #[must_use]
    pub fn is_analysis(&self) -> bool {
        self.method == ANALYSIS_METHOD
    }
}

/// Label in the `Step` column of a procedure row.
///
/// Any scalar is accepted: integers stay numbers, everything else (text,
/// decimals such as `1.5`, booleans, a blank cell) is kept as text. Only the
/// marker words matter when rendering; other labels are renumbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepLabel {
    /// An integer label as written by the author.
    Number(i64),
    /// Any other label, such as `Note`, `Verif`, or `1.5`.
    Text(String),
}

impl<'de> Deserialize<'de> for StepLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl Visitor<'_> for LabelVisitor {
            type Value = StepLabel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a step number or label")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StepLabel, E> {
                Ok(StepLabel::Number(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StepLabel, E> {
                Ok(i64::try_from(v).map_or_else(|_| StepLabel::Text(v.to_string()), StepLabel::Number))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<StepLabel, E> {
                Ok(StepLabel::Text(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<StepLabel, E> {
                Ok(StepLabel::Text(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StepLabel, E> {
                Ok(StepLabel::Text(v.to_owned()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<StepLabel, E> {
                Ok(StepLabel::Text(String::new()))
            }
        }

        deserializer.deserialize_any(LabelVisitor)
    }
}

impl StepLabel {
    /// Whether this row is a note or verification remark.
    ///
    /// Only textual labels can be markers; the comparison ignores case.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(text) => MARKER_LABELS
                .iter()
                .any(|marker| text.eq_ignore_ascii_case(marker)),
        }
    }
}

/// One row of the procedure table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Step {
    /// Step label; numbers are recomputed when rendering.
    #[serde(rename = "Step")]
    pub label: StepLabel,
    /// What the tester does.
    #[serde(rename = "Action", deserialize_with = "text")]
    pub action: String,
    /// What the tester should observe; may be empty.
    #[serde(rename = "Expected Result", default, deserialize_with = "text")]
    pub expected_result: String,
}

/// A complete test case description.
///
/// `id`, `title`, and `steps` are required; absent text blocks are empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    /// Test case identifier, for example `PT-001.1`.
    #[serde(deserialize_with = "text")]
    pub id: String,
    /// Short human readable title.
    #[serde(deserialize_with = "text")]
    pub title: String,
    /// Why the test exists.
    #[serde(default, deserialize_with = "text")]
    pub purpose: String,
    /// What the test does.
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    /// Prerequisite conditions text block.
    #[serde(default, deserialize_with = "text")]
    pub prereqs: String,
    /// Test inputs text block.
    #[serde(default, deserialize_with = "text")]
    pub inputs: String,
    /// Expected results text block.
    #[serde(default, deserialize_with = "text")]
    pub expected_results: String,
    /// Assumptions and constraints text block.
    #[serde(default, deserialize_with = "text")]
    pub assumptions_constraints: String,
    /// Requirements traced to this test, `None` when the key is absent.
    #[serde(default)]
    pub reqs: Option<Vec<Requirement>>,
    /// Ordered procedure rows.
    pub steps: Vec<Step>,
}

impl TestCase {
    /// Whether any traced requirement is verified by analysis.
    #[must_use]
    pub fn is_analysis(&self) -> bool {
        self.reqs
            .as_deref()
            .is_some_and(|reqs| reqs.iter().any(Requirement::is_analysis))
    }

    /// Parse a test case from YAML text, labelling diagnostics with `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TestCaseError::Invalid`] when the YAML is malformed or a
    /// required field is missing or of the wrong type.
    pub fn from_str_named(yaml: &str, name: &SourceName) -> Result<Self, TestCaseError> {
        serde_saphyr::from_str::<serde_json::Value>(yaml).map_err(|e| TestCaseError::Invalid {
            name: name.clone(),
            source: syntax_error(&e, yaml, name),
        })?;
        serde_saphyr::from_str(yaml).map_err(|e| TestCaseError::Invalid {
            name: name.clone(),
            source: structure_error(&e, yaml, name),
        })
    }

    /// Load a test case from a file.
    ///
    /// # Errors
    ///
    /// Returns [`TestCaseError::Read`] when the file cannot be read and
    /// [`TestCaseError::Invalid`] when its content is not a valid test case.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TestCaseError> {
        let path_ref = path.as_ref();
        let data = fs::read_to_string(path_ref).map_err(|source| TestCaseError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_str_named(&data, &SourceName::new(path_ref.display().to_string()))
    }
}

/// Deserialise a scalar as text.
///
/// Authors write `purpose: 3` or leave a block empty; both should render
/// rather than fail, so numbers and booleans are stringified and a blank or
/// null value becomes the empty string.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected text, found {}",
            if other.is_array() { "a list" } else { "a mapping" }
        ))),
    }
}
