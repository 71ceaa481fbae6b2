//! Hints for the usual hand-editing mistakes in test case files, keyed by a
//! lowercase fragment of the parser message.

pub(crate) const TAB_HINT: &str = "Use spaces for indentation; tabs are invalid in YAML.";

pub(crate) const YAML_HINTS: [(&str, &str); 6] = [
    (
        "did not find expected '-'",
        "Start each step or requirement with '-' and keep list items aligned.",
    ),
    (
        "expected ':'",
        "Ensure each key is followed by ':' separating key and value.",
    ),
    (
        "mapping values are not allowed",
        "Quote text values that contain ': ' (for example actions or results).",
    ),
    (
        "found character that cannot start any token",
        "Quote values that start with '@', '`', or '%' and indent with spaces.",
    ),
    (
        "unknown escape character",
        "Use single quotes or a block scalar ('|') for text containing backslashes.",
    ),
    (
        "missing field",
        "Every test case needs id, title, and steps; every step needs Step and Action.",
    ),
];
