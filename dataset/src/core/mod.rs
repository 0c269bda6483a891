//! Deterministic, pure logic for dataset ingestion.
//!
//! Core modules must be free of I/O side effects. They operate on strings and
//! in-memory tables and return deterministic outputs suitable for tests.

pub mod range;
pub mod regroup;
pub mod tokenizer;
pub mod value;

/// Column separator in GIGS data files.
pub const COLUMN_SEPARATOR: char = '\t';
/// Separator between elements of a list cell.
pub const ELEMENT_SEPARATOR: char = ';';
/// Separator between the bounds of an integer range.
pub const RANGE_SEPARATOR: char = '-';
/// Prefix of the step in an integer range (`16362-16398 +2`).
pub const STEP_PREFIX: char = '+';
/// Quote character; doubled inside a quoted cell to escape itself.
pub const QUOTE: char = '"';

/// Trim Unicode whitespace, leaving tabs in place.
pub(crate) fn trim_cell(text: &str) -> &str {
    text.trim_matches(|ch: char| ch != COLUMN_SEPARATOR && ch.is_whitespace())
}
