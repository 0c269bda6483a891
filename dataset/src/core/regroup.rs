//! Row regrouping: collapse templated consecutive rows into one record.
//!
//! GIGS tables often list families of objects that differ only by an index,
//! e.g. `WGS 84 / UTM zone 1N` ... `WGS 84 / UTM zone 60N`. Regrouping turns
//! such a run into a single row whose code column holds all the codes and
//! whose name column holds the shared stem.

use regex::Regex;
use tracing::debug;

use crate::core::value::Value;
use crate::error::DatasetError;
use crate::table::{Row, Table};

/// Merge runs of consecutive rows that differ only by `name_patterns`.
///
/// Patterns are applied one after the other, each scanning the whole table.
/// Two rows are mergeable under a pattern when both have a scalar integer in
/// `code_column`, equal values in every `constant_columns` entry, and the
/// same name parts once the pattern matches are split out. A maximal run of
/// two or more mergeable rows becomes one row carrying the code array, the
/// name stem and the constants; every other cell of that row is absent.
///
/// Merged rows hold a code array and are therefore ignored by later
/// patterns. Returns the number of runs merged. The cursor is rewound.
pub fn regroup(
    table: &mut Table,
    code_column: usize,
    constant_columns: &[usize],
    name_column: usize,
    name_patterns: &[&str],
) -> Result<usize, DatasetError> {
    let patterns = name_patterns
        .iter()
        .map(|pattern| Regex::new(pattern))
        .collect::<Result<Vec<_>, _>>()?;
    let key = GroupKey {
        code_column,
        constant_columns,
        name_column,
    };

    let source_name = table.source_name().to_string();
    let rows = table.rows_mut();
    let mut merged_runs = 0;
    for pattern in &patterns {
        let mut start = 0;
        while start < rows.len() {
            let end = key.run_end(rows, start, pattern);
            if end - start >= 2 {
                let merged = key.merge(&rows[start..end], pattern);
                debug!(
                    source = %source_name,
                    pattern = pattern.as_str(),
                    start,
                    count = end - start,
                    "merged rows"
                );
                rows.drain(start + 1..end);
                rows[start] = merged;
                merged_runs += 1;
            }
            start += 1;
        }
    }
    table.rewind();
    Ok(merged_runs)
}

struct GroupKey<'a> {
    code_column: usize,
    constant_columns: &'a [usize],
    name_column: usize,
}

impl GroupKey<'_> {
    /// Exclusive end of the mergeable run beginning at `start`.
    fn run_end(&self, rows: &[Row], start: usize, pattern: &Regex) -> usize {
        let first = &rows[start];
        let Some(residual) = self.residual(first, pattern) else {
            return start + 1;
        };
        let mut end = start + 1;
        while end < rows.len() {
            let candidate = &rows[end];
            let same_constants = self
                .constant_columns
                .iter()
                .all(|&column| same_cell(first.get(column), candidate.get(column)));
            if !same_constants || self.residual(candidate, pattern).as_ref() != Some(&residual) {
                break;
            }
            end += 1;
        }
        end
    }

    /// Name parts left after splitting on `pattern`, or `None` if the row
    /// cannot take part in a merge.
    fn residual<'r>(&self, row: &'r Row, pattern: &Regex) -> Option<Vec<&'r str>> {
        if !matches!(row.get(self.code_column), Some(Value::Int(_))) {
            return None;
        }
        let Some(Value::Str(name)) = row.get(self.name_column) else {
            return None;
        };
        let mut parts: Vec<&str> = pattern.split(name).collect();
        while parts.last().is_some_and(|part| part.is_empty()) {
            parts.pop();
        }
        Some(parts)
    }

    fn merge(&self, run: &[Row], pattern: &Regex) -> Row {
        let first = &run[0];
        let codes = run
            .iter()
            .filter_map(|row| match row.get(self.code_column) {
                Some(Value::Int(code)) => Some(*code),
                _ => None,
            })
            .collect();
        let stem = match first.get(self.name_column) {
            Some(Value::Str(name)) => pattern.replace_all(name, "").trim().to_string(),
            _ => String::new(),
        };

        let mut merged = Row::new(vec![None; first.width()]);
        let cells = merged.cells_mut();
        for &column in self.constant_columns {
            if let Some(slot) = cells.get_mut(column) {
                *slot = first.get(column).cloned();
            }
        }
        cells[self.code_column] = Some(Value::Ints(codes));
        cells[self.name_column] = Some(Value::Str(stem));
        merged
    }
}

/// Value equality where two NaN doubles compare equal.
fn same_cell(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(Value::Double(a)), Some(Value::Double(b))) => a == b || (a.is_nan() && b.is_nan()),
        _ => left == right,
    }
}
