//! Error taxonomy for dataset ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed tabular input: unbalanced quote, unparsable typed cell, or an
/// unknown column type.
///
/// Produced by the pure tokenizer layer, which has no notion of files or
/// line numbers. The loader attaches that context via [`DatasetError::Format`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatError {
    pub message: String,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while locating, reading or post-processing a dataset table.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{source_name}:{line_number}: {source} (line: {line:?})")]
    Format {
        source_name: String,
        line_number: usize,
        line: String,
        #[source]
        source: FormatError,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot read dataset {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),
}
