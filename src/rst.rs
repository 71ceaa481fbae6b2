//! Minimal reStructuredText markup objects.
//!
//! Each type renders a self-contained block without surrounding blank lines;
//! callers join blocks with blank-line separation.

use std::fmt::{self, Write as _};
use unicode_width::UnicodeWidthStr;

/// Indentation used for directive options and bodies.
const DIRECTIVE_INDENT: &str = "   ";

/// Underline characters for header levels 1 to 7.
const HEADER_CHARS: [char; 7] = ['=', '-', '~', '+', '*', '#', '^'];

/// A section title with an underline.
///
/// # Examples
///
/// ```rust
/// use rstdocgen::rst::Header;
///
/// let header = Header::new("Load test", 2);
/// assert_eq!(header.to_string(), "Load test\n---------");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    title: String,
    level: usize,
}

impl Header {
    /// Create a header; levels outside `1..=7` are clamped into range.
    #[must_use]
    pub fn new(title: impl Into<String>, level: usize) -> Self {
        Self {
            title: title.into(),
            level: level.clamp(1, HEADER_CHARS.len()),
        }
    }

    /// Underline character for this header's level.
    #[must_use]
    pub fn underline_char(&self) -> char {
        HEADER_CHARS
            .get(self.level - 1)
            .copied()
            .unwrap_or('=')
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = UnicodeWidthStr::width(self.title.as_str()).max(1);
        let underline: String = std::iter::repeat_n(self.underline_char(), width).collect();
        write!(f, "{}\n{underline}", self.title)
    }
}

/// A field list such as `:ID: PT-001.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    fields: Vec<(String, String)>,
}

impl FieldList {
    /// Create an empty field list.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, returning the list for chaining.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.push(name, body);
        self
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.fields.push((name.into(), body.into()));
    }

    /// Whether the list has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(self.fields.len());
        for (name, body) in &self.fields {
            let marker = format!(":{name}:");
            let body = indent_continuation(body.trim_end(), DIRECTIVE_INDENT);
            if body.is_empty() {
                lines.push(marker);
            } else {
                lines.push(format!("{marker} {body}"));
            }
        }
        f.write_str(&lines.join("\n"))
    }
}

/// A `list-table` directive.
///
/// ```rust
/// use rstdocgen::rst::ListTable;
///
/// let table = ListTable::new("Steps")
///     .header_rows(1)
///     .row(["Step", "Action"])
///     .row(["1", "Start"]);
/// assert!(table.to_string().starts_with(".. list-table:: Steps\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTable {
    title: String,
    header_rows: usize,
    widths: Vec<u16>,
    rows: Vec<Vec<String>>,
}

impl ListTable {
    /// Create an empty table with the given caption.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Number of leading rows rendered as table headers.
    #[must_use]
    pub fn header_rows(mut self, rows: usize) -> Self {
        self.header_rows = rows;
        self
    }

    /// Relative column widths.
    #[must_use]
    pub fn widths(mut self, widths: impl IntoIterator<Item = u16>) -> Self {
        self.widths = widths.into_iter().collect();
        self
    }

    /// Append a row of cells.
    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    /// Append a row of cells in place.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

impl fmt::Display for ListTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.title.is_empty() {
            String::new()
        } else {
            format!(" {}", self.title)
        };
        writeln!(f, ".. list-table::{title}")?;
        if !self.widths.is_empty() {
            let widths: Vec<String> = self.widths.iter().map(u16::to_string).collect();
            writeln!(f, "{DIRECTIVE_INDENT}:widths: {}", widths.join(" "))?;
        }
        if self.header_rows > 0 {
            writeln!(f, "{DIRECTIVE_INDENT}:header-rows: {}", self.header_rows)?;
        }
        // Cell content starts at the same column for the first and later cells.
        let cell_indent = format!("{DIRECTIVE_INDENT}    ");
        let mut body = String::new();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                let marker = if idx == 0 { "* -" } else { "  -" };
                let content = indent_continuation(cell.trim_end(), &cell_indent);
                if content.is_empty() {
                    writeln!(body, "{DIRECTIVE_INDENT}{marker}")?;
                } else {
                    writeln!(body, "{DIRECTIVE_INDENT}{marker} {content}")?;
                }
            }
        }
        write!(f, "\n{}", body.trim_end())
    }
}

/// An `include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    path: String,
}

impl Include {
    /// Create an include directive for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".. include:: {}", self.path)
    }
}

/// Indent every line after the first by `indent`, leaving blank lines empty.
fn indent_continuation(text: &str, indent: &str) -> String {
    let mut lines = text.lines();
    let mut out = lines.next().unwrap_or_default().to_owned();
    for line in lines {
        out.push('\n');
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Title\n=====")]
    #[case(2, "Title\n-----")]
    #[case(4, "Title\n+++++")]
    #[case(0, "Title\n=====")]
    #[case(99, "Title\n^^^^^")]
    fn header_levels(#[case] level: usize, #[case] expected: &str) {
        assert_eq!(Header::new("Title", level).to_string(), expected);
    }

    #[test]
    fn header_underline_matches_display_width() {
        // Two wide characters occupy four columns.
        assert_eq!(Header::new("試験", 2).to_string(), "試験\n----");
    }

    #[test]
    fn field_list_indents_multiline_bodies() {
        let list = FieldList::new()
            .field("ID", "PT-001.1")
            .field("Purpose", "first line\nsecond line\n")
            .field("Empty", "");
        assert_eq!(
            list.to_string(),
            ":ID: PT-001.1\n:Purpose: first line\n   second line\n:Empty:"
        );
    }

    #[test]
    fn list_table_renders_options_and_cells() {
        let table = ListTable::new("Steps and Notes")
            .header_rows(1)
            .widths([6, 44, 22])
            .row(["Step", "Action", "Expected Result"])
            .row(["1", "Run\n\nthen wait", "|"]);
        let expected = concat!(
            ".. list-table:: Steps and Notes\n",
            "   :widths: 6 44 22\n",
            "   :header-rows: 1\n",
            "\n",
            "   * - Step\n",
            "     - Action\n",
            "     - Expected Result\n",
            "   * - 1\n",
            "     - Run\n",
            "\n",
            "       then wait\n",
            "     - |",
        );
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn include_directive() {
        assert_eq!(
            Include::new("../tests/PT-001.1-load.rst").to_string(),
            ".. include:: ../tests/PT-001.1-load.rst"
        );
    }
}
