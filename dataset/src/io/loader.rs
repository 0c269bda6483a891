//! Table loading from dataset files.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::core::tokenizer::parse_row;
use crate::core::value::ColumnType;
use crate::error::DatasetError;
use crate::table::Table;

const COMMENT_PREFIX: char = '#';
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Load a dataset file into a [`Table`].
///
/// The whole file is read up front; no handle outlives this call.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path, columns: &[ColumnType]) -> Result<Table, DatasetError> {
    let contents = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_table(&source_name, &contents, columns)
}

/// Parse dataset text already held in memory.
///
/// Blank lines and lines starting with `#` are skipped. Tokenizer failures
/// carry `source_name` and the 1-based line number.
pub fn parse_table(
    source_name: &str,
    contents: &str,
    columns: &[ColumnType],
) -> Result<Table, DatasetError> {
    let contents = contents.strip_prefix(BYTE_ORDER_MARK).unwrap_or(contents);
    let mut rows = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let row = parse_row(line, columns).map_err(|source| DatasetError::Format {
            source_name: source_name.to_string(),
            line_number: index + 1,
            line: line.to_string(),
            source,
        })?;
        rows.push(row);
    }
    debug!(source = source_name, rows = rows.len(), "table loaded");
    Ok(Table::new(source_name, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ColumnType::{Int, Str};

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\n\n1\tone\n   \n  # indented comment\n2\ttwo\n";
        let table = parse_table("inline", text, &[Int, Str]).expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].str(1), Ok(Some("two")));
    }

    #[test]
    fn reports_failing_line_number() {
        let text = "# header\n1\tone\nx\ttwo\n";
        let err = parse_table("inline", text, &[Int, Str]).expect_err("bad row");
        match err {
            DatasetError::Format {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(line, "x\ttwo");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn strips_byte_order_mark() {
        let table = parse_table("bom", "\u{FEFF}7030\tWGS 84\n", &[Int, Str]).expect("table");
        assert_eq!(table.rows()[0].int(0), Ok(Some(7030)));
    }

    #[test]
    fn crlf_line_endings() {
        let table = parse_table("crlf", "1\ta\r\n2\tb\r\n", &[Int, Str]).expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].str(1), Ok(Some("a")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load(&temp.path().join("missing.txt"), &[Int]).expect_err("missing");
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn load_names_table_after_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("GIGS_lib_2201_Unit.txt");
        fs::write(&path, "9001\tmetre\n").expect("write");
        let table = load(&path, &[Int, Str]).expect("load");
        assert_eq!(table.source_name(), "GIGS_lib_2201_Unit.txt");
        assert_eq!(table.len(), 1);
    }
}
