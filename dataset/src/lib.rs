//! Tabular ingestion engine for GIGS reference datasets.
//!
//! GIGS datasets are tab-separated text files describing geodetic objects
//! (units, ellipsoids, datums, coordinate reference systems). This crate
//! turns them into typed, cursor-readable tables. The architecture keeps the
//! same split as the rest of the workspace:
//!
//! - **[`core`]**: Pure, deterministic logic (row tokenizing, range expansion,
//!   row regrouping). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (reading dataset files, resolving
//!   the dataset root from the environment).
//!
//! [`table`] holds the in-memory row store shared by both layers.

pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod table;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::range::{RangeSpec, expand};
pub use crate::core::regroup::regroup;
pub use crate::core::tokenizer::{parse_row, quote_cell};
pub use crate::core::value::{ColumnType, Value};
pub use crate::error::{DatasetError, FormatError};
pub use crate::io::loader::{load, parse_table};
pub use crate::io::locator::{DatasetLocator, Series};
pub use crate::table::{Row, Table};
