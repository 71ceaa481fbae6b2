//! Mapping of `serde_saphyr` errors onto [`miette`] diagnostics.

// The unused_assignments lint fires on miette/thiserror derive expansion in
// some Rust versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use super::SourceName;
use super::hints::{TAB_HINT, YAML_HINTS};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

/// The document is not well-formed YAML.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(rstdocgen::yaml::parse))]
struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    hint: Option<&'static str>,
    message: String,
}

/// The document parses but does not have the expected fields or types.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(rstdocgen::yaml::structure))]
struct StructureDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("unexpected value")]
    span: Option<SourceSpan>,
    #[help]
    hint: Option<&'static str>,
    message: String,
}

/// Span of the character at `loc`, or an empty span at the line end when the
/// column lies past it. Unknown locations (line 0) have no span.
fn span_at(text: &str, loc: Location) -> Option<SourceSpan> {
    let line = usize::try_from(loc.line()).ok()?.checked_sub(1)?;
    let column = usize::try_from(loc.column()).ok()?.saturating_sub(1);
    let line_start = match line {
        0 => 0,
        n => text.match_indices('\n').nth(n - 1).map(|(at, _)| at + 1)?,
    };
    let rest = text.get(line_start..)?;
    let content = rest.split('\n').next().unwrap_or_default();
    let content = content.strip_suffix('\r').unwrap_or(content);
    let span = content.char_indices().nth(column).map_or_else(
        || SourceSpan::new((line_start + content.len()).into(), 0),
        |(offset, ch)| SourceSpan::new((line_start + offset).into(), ch.len_utf8()),
    );
    Some(span)
}

fn indented_with_tabs(text: &str) -> bool {
    text.lines()
        .any(|line| line.chars().take_while(|c| c.is_whitespace()).any(|c| c == '\t'))
}

fn hint_for(reason: &str, text: &str) -> Option<&'static str> {
    if indented_with_tabs(text) {
        return Some(TAB_HINT);
    }
    let reason = reason.to_lowercase();
    YAML_HINTS
        .iter()
        .find(|(needle, _)| reason.contains(*needle))
        .map(|(_, hint)| *hint)
}

fn with_hint(mut message: String, hint: Option<&str>) -> String {
    if let Some(hint) = hint {
        message.push_str("\nhelp: ");
        message.push_str(hint);
    }
    message
}

/// Diagnose a document that failed to parse as YAML.
#[must_use]
pub fn syntax_error(
    err: &YamlError,
    text: &str,
    name: &SourceName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let reason = err.to_string();
    let hint = hint_for(&reason, text);
    Box::new(SyntaxDiagnostic {
        src: NamedSource::new(name.as_str(), text.to_owned()),
        span: err.location().and_then(|loc| span_at(text, loc)),
        hint,
        message: with_hint(format!("invalid YAML in {name}: {reason}"), hint),
    })
}

/// Diagnose a well-formed document whose fields do not match the expected
/// record, for example a missing `title` or a list where text is expected.
#[must_use]
pub fn structure_error(
    err: &YamlError,
    text: &str,
    name: &SourceName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let reason = err.to_string();
    let lower = reason.to_lowercase();
    let hint = YAML_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| *hint);
    Box::new(StructureDiagnostic {
        src: NamedSource::new(name.as_str(), text.to_owned()),
        span: err.location().and_then(|loc| span_at(text, loc)),
        hint,
        message: with_hint(
            format!("{name} does not match the expected structure: {reason}"),
            hint,
        ),
    })
}
