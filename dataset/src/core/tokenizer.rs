//! Row tokenizer: one physical line into one typed [`Row`].

use std::borrow::Cow;

use super::range::expand;
use super::value::{ColumnType, Value};
use super::{COLUMN_SEPARATOR, ELEMENT_SEPARATOR, QUOTE, trim_cell};
use crate::error::FormatError;
use crate::table::Row;

/// Split `line` on tabs and coerce each cell to its declared column type.
///
/// The returned row always has `columns.len()` cells. Missing trailing cells
/// and empty cells are absent; cells beyond the declaration are ignored.
pub fn parse_row(line: &str, columns: &[ColumnType]) -> Result<Row, FormatError> {
    let mut cells = Vec::with_capacity(columns.len());
    let mut rest = Some(line);
    for &column in columns {
        let raw = match rest {
            Some(text) => {
                let (cell, remaining) = split_cell(text)?;
                rest = remaining;
                Some(cell)
            }
            None => None,
        };
        let value = match raw {
            Some(cell) => {
                let cell = trim_cell(&cell);
                if cell.is_empty() {
                    None
                } else {
                    Some(parse_value(cell, column)?)
                }
            }
            None => None,
        };
        cells.push(value);
    }
    Ok(Row::new(cells))
}

/// Serialize `text` as a quoted cell, doubling embedded quotes.
pub fn quote_cell(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(QUOTE);
    for ch in text.chars() {
        if ch == QUOTE {
            quoted.push(QUOTE);
        }
        quoted.push(ch);
    }
    quoted.push(QUOTE);
    quoted
}

/// Take the first cell off `text`, returning it with the text after its separator.
///
/// Quoted cells are unescaped, which is the only case that allocates.
fn split_cell(text: &str) -> Result<(Cow<'_, str>, Option<&str>), FormatError> {
    let unquoted = text.trim_start_matches(|ch: char| ch != COLUMN_SEPARATOR && ch.is_whitespace());
    if !unquoted.starts_with(QUOTE) {
        return Ok(match text.find(COLUMN_SEPARATOR) {
            Some(tab) => (
                Cow::Borrowed(&text[..tab]),
                Some(&text[tab + COLUMN_SEPARATOR.len_utf8()..]),
            ),
            None => (Cow::Borrowed(text), None),
        });
    }

    let body = &unquoted[QUOTE.len_utf8()..];
    let mut value = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch != QUOTE {
            value.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, next)) if *next == QUOTE) {
            chars.next();
            value.push(QUOTE);
            continue;
        }
        let after = &body[index + QUOTE.len_utf8()..];
        let (trailing, remaining) = match after.find(COLUMN_SEPARATOR) {
            Some(tab) => (
                &after[..tab],
                Some(&after[tab + COLUMN_SEPARATOR.len_utf8()..]),
            ),
            None => (after, None),
        };
        if !trim_cell(trailing).is_empty() {
            return Err(FormatError::new(
                "unexpected characters after closing quote",
            ));
        }
        return Ok((Cow::Owned(value), remaining));
    }
    Err(FormatError::new("unbalanced quote"))
}

fn parse_value(cell: &str, column: ColumnType) -> Result<Value, FormatError> {
    match column {
        ColumnType::Str => Ok(Value::Str(cell.to_string())),
        ColumnType::Int => cell
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|err| FormatError::new(format!("invalid integer {cell:?}: {err}"))),
        ColumnType::Double => {
            if cell.eq_ignore_ascii_case("NULL") {
                return Ok(Value::Double(f64::NAN));
            }
            cell.parse::<f64>()
                .map(Value::Double)
                .map_err(|err| FormatError::new(format!("invalid double {cell:?}: {err}")))
        }
        ColumnType::Bool => {
            if cell.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if cell.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(FormatError::new(format!("invalid boolean {cell:?}")))
            }
        }
        ColumnType::StrList => Ok(Value::Strs(split_list(cell))),
        ColumnType::IntList => Ok(Value::Ints(expand(cell)?)),
    }
}

/// Split a list cell on semicolons, trimming elements and dropping empty ones.
pub(crate) fn split_list(cell: &str) -> Vec<String> {
    cell.split(ELEMENT_SEPARATOR)
        .map(trim_cell)
        .filter(|element| !element.is_empty())
        .map(str::to_string)
        .collect()
}
