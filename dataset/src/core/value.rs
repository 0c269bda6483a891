//! Column types and typed cell values.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FormatError;

/// Declared type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Int,
    Double,
    Bool,
    /// Semicolon-separated strings (aliases, remarks lists).
    StrList,
    /// Semicolon-separated integers and ranges (`16001-16003; 16099`).
    IntList,
}

impl FromStr for ColumnType {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(ColumnType::Str),
            "int" | "integer" => Ok(ColumnType::Int),
            "double" | "f64" => Ok(ColumnType::Double),
            "bool" | "boolean" => Ok(ColumnType::Bool),
            "str-list" => Ok(ColumnType::StrList),
            "int-list" => Ok(ColumnType::IntList),
            other => Err(FormatError::new(format!(
                "unsupported column type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Str => "str",
            ColumnType::Int => "int",
            ColumnType::Double => "double",
            ColumnType::Bool => "bool",
            ColumnType::StrList => "str-list",
            ColumnType::IntList => "int-list",
        };
        f.write_str(name)
    }
}

/// Parse a comma-separated column declaration such as `int,str,str-list,double`.
pub fn parse_column_types(declaration: &str) -> Result<Vec<ColumnType>, FormatError> {
    declaration
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// A typed, non-absent cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i32),
    Double(f64),
    Bool(bool),
    /// Integer sequence: an expanded `IntList` cell or a regrouped code column.
    Ints(Vec<i32>),
    Strs(Vec<String>),
}

impl Value {
    /// Short type label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Double(_) => "double",
            Value::Bool(_) => "boolean",
            Value::Ints(_) => "integer sequence",
            Value::Strs(_) => "string list",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_declaration() {
        let types = parse_column_types("int, str,str-list ,double").expect("types");
        assert_eq!(
            types,
            vec![
                ColumnType::Int,
                ColumnType::Str,
                ColumnType::StrList,
                ColumnType::Double
            ]
        );
    }

    #[test]
    fn rejects_unknown_column_type() {
        let err = parse_column_types("int,float").expect_err("unknown type");
        assert!(err.message.contains("unsupported column type"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for ty in [
            ColumnType::Str,
            ColumnType::Int,
            ColumnType::Double,
            ColumnType::Bool,
            ColumnType::StrList,
            ColumnType::IntList,
        ] {
            assert_eq!(ty.to_string().parse::<ColumnType>(), Ok(ty));
        }
    }
}
