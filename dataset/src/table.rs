//! In-memory row store with a forward cursor.

use serde::Serialize;

use crate::core::range::expand;
use crate::core::tokenizer::split_list;
use crate::core::value::Value;
use crate::error::FormatError;

/// One dataset record: a fixed-width sequence of optional typed cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Option<Value>>,
}

impl Row {
    pub fn new(cells: Vec<Option<Value>>) -> Self {
        Self { cells }
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Option<Value>] {
        &self.cells
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.cells.get(column).and_then(Option::as_ref)
    }

    pub fn is_null(&self, column: usize) -> bool {
        self.get(column).is_none()
    }

    pub fn str(&self, column: usize) -> Result<Option<&str>, FormatError> {
        match self.get(column) {
            None => Ok(None),
            Some(Value::Str(text)) => Ok(Some(text)),
            Some(other) => Err(mismatch(column, "string", other)),
        }
    }

    pub fn int(&self, column: usize) -> Result<Option<i32>, FormatError> {
        match self.get(column) {
            None => Ok(None),
            Some(Value::Int(value)) => Ok(Some(*value)),
            Some(other) => Err(mismatch(column, "integer", other)),
        }
    }

    pub fn double(&self, column: usize) -> Result<Option<f64>, FormatError> {
        match self.get(column) {
            None => Ok(None),
            Some(Value::Double(value)) => Ok(Some(*value)),
            Some(Value::Int(value)) => Ok(Some(f64::from(*value))),
            Some(other) => Err(mismatch(column, "double", other)),
        }
    }

    pub fn boolean(&self, column: usize) -> Result<Option<bool>, FormatError> {
        match self.get(column) {
            None => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(mismatch(column, "boolean", other)),
        }
    }

    /// Strings of a list column, or of a plain string column split on semicolons.
    ///
    /// An absent cell yields an empty list.
    pub fn strings(&self, column: usize) -> Result<Vec<String>, FormatError> {
        match self.get(column) {
            None => Ok(Vec::new()),
            Some(Value::Strs(values)) => Ok(values.clone()),
            Some(Value::Str(text)) => Ok(split_list(text)),
            Some(other) => Err(mismatch(column, "string list", other)),
        }
    }

    /// Integer codes of a cell: a scalar yields itself, a string is range-expanded.
    ///
    /// An absent cell yields an empty sequence.
    pub fn ints(&self, column: usize) -> Result<Vec<i32>, FormatError> {
        match self.get(column) {
            None => Ok(Vec::new()),
            Some(Value::Int(value)) => Ok(vec![*value]),
            Some(Value::Ints(values)) => Ok(values.clone()),
            Some(Value::Str(text)) => expand(text),
            Some(other) => Err(mismatch(column, "integer sequence", other)),
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Option<Value>] {
        &mut self.cells
    }
}

fn mismatch(column: usize, expected: &str, actual: &Value) -> FormatError {
    FormatError::new(format!(
        "column {column}: expected {expected}, found {}",
        actual.kind()
    ))
}

/// An ordered sequence of rows read through a cursor.
///
/// The cursor starts before the first row; [`Table::advance`] moves it
/// forward until it is exhausted at `len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    source_name: String,
    rows: Vec<Row>,
    cursor: Option<usize>,
}

impl Table {
    pub fn new(source_name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            source_name: source_name.into(),
            rows,
            cursor: None,
        }
    }

    /// File name (or other label) the rows were loaded from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate all rows without moving the cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Move to the next row. Returns `false` once the table is exhausted.
    pub fn advance(&mut self) -> bool {
        let next = match self.cursor {
            None => 0,
            Some(index) => (index + 1).min(self.rows.len()),
        };
        self.cursor = Some(next);
        next < self.rows.len()
    }

    /// Row under the cursor, if the cursor is on a row.
    pub fn current(&self) -> Option<&Row> {
        self.cursor.and_then(|index| self.rows.get(index))
    }

    /// Cursor position: `None` before the first row, `Some(len)` when exhausted.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = None;
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(codes: &[i32]) -> Table {
        let rows = codes
            .iter()
            .map(|code| Row::new(vec![Some(Value::Int(*code))]))
            .collect();
        Table::new("codes", rows)
    }

    #[test]
    fn cursor_walks_rows_then_exhausts() {
        let mut table = table(&[1, 2]);
        assert_eq!(table.position(), None);
        assert!(table.current().is_none());

        assert!(table.advance());
        assert_eq!(table.current().and_then(|row| row.int(0).ok().flatten()), Some(1));
        assert!(table.advance());
        assert_eq!(table.current().and_then(|row| row.int(0).ok().flatten()), Some(2));

        assert!(!table.advance());
        assert!(!table.advance());
        assert_eq!(table.position(), Some(2));
        assert!(table.current().is_none());

        table.rewind();
        assert!(table.advance());
        assert_eq!(table.position(), Some(0));
    }

    #[test]
    fn empty_table_is_exhausted_on_first_advance() {
        let mut table = table(&[]);
        assert!(!table.advance());
        assert_eq!(table.position(), Some(0));
    }

    #[test]
    fn ints_accepts_scalar_sequence_and_range_text() {
        let row = Row::new(vec![
            Some(Value::Int(4326)),
            Some(Value::Ints(vec![1, 2])),
            Some(Value::Str("5-7".to_string())),
            None,
        ]);
        assert_eq!(row.ints(0), Ok(vec![4326]));
        assert_eq!(row.ints(1), Ok(vec![1, 2]));
        assert_eq!(row.ints(2), Ok(vec![5, 6, 7]));
        assert_eq!(row.ints(3), Ok(Vec::new()));
    }

    #[test]
    fn typed_accessor_reports_mismatch() {
        let row = Row::new(vec![Some(Value::Str("x".to_string()))]);
        let err = row.int(0).expect_err("mismatch");
        assert_eq!(err.message, "column 0: expected integer, found string");
    }
}
