//! Test case categories keyed by their ID prefix.
//!
//! Setup cases (`SU`) belong with the STD test preparations chapter while
//! performance (`PT`) and security (`ST`) cases belong with the test
//! descriptions. The category name doubles as the output folder for generated
//! YAML test cases.

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Category of a test case, selected by the leading ID prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Setup and data collection cases that other cases depend on.
    Setup,
    /// Performance test cases.
    Performance,
    /// Security test cases.
    Security,
}

impl Category {
    /// Folder name used for this category under the output path.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Performance => "performance",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Errors raised while resolving a category.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum CategoryError {
    /// The ID prefix has no registered category.
    #[error("unknown test case prefix '{prefix}' in '{name}'")]
    #[diagnostic(
        code(rstdocgen::category::unknown_prefix),
        help("test case IDs must start with one of: {known}")
    )]
    UnknownPrefix {
        /// The prefix that failed to resolve.
        prefix: String,
        /// The name the prefix was taken from.
        name: String,
        /// Comma separated list of registered prefixes.
        known: String,
    },
}

/// Immutable lookup table from ID prefix to [`Category`].
///
/// Build it once at startup and pass it to whatever needs to route test
/// cases.
///
/// # Examples
///
/// ```rust
/// use rstdocgen::category::{Category, PrefixMap};
///
/// let map = PrefixMap::standard();
/// let category = map.category_for_name("PT-001.1-load.yaml", "-").unwrap();
/// assert_eq!(category, Category::Performance);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    entries: BTreeMap<String, Category>,
}

impl PrefixMap {
    /// The standard STD prefixes: `PT`, `ST`, and `SU`.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_entries([
            ("PT", Category::Performance),
            ("ST", Category::Security),
            ("SU", Category::Setup),
        ])
    }

    /// Build a map from explicit `(prefix, category)` pairs.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Category)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(prefix, category)| (prefix.to_owned(), category))
                .collect(),
        }
    }

    /// Look up the category registered for `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<Category> {
        self.entries.get(prefix).copied()
    }

    /// Resolve the category of a test case name such as `PT-001.1-load.yaml`.
    ///
    /// The prefix is the text before the first `id_sep`. When the separator is
    /// absent the whole name is treated as the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::UnknownPrefix`] when the prefix is not
    /// registered.
    pub fn category_for_name(&self, name: &str, id_sep: &str) -> Result<Category, CategoryError> {
        let prefix = name.split_once(id_sep).map_or(name, |(head, _)| head);
        self.get(prefix)
            .ok_or_else(|| CategoryError::UnknownPrefix {
                prefix: prefix.to_owned(),
                name: name.to_owned(),
                known: self.known_prefixes(),
            })
    }

    fn known_prefixes(&self) -> String {
        self.entries
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
