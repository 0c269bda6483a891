//! Dataset file location.
//!
//! Dataset files live under a root directory, one subdirectory per GIGS test
//! series. The root comes from configuration or the `GIGS_DATA_DIR`
//! environment variable.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::value::ColumnType;
use crate::error::DatasetError;
use crate::io::loader::load;
use crate::table::Table;

/// Environment variable naming the dataset root directory.
pub const DATA_DIR_ENV: &str = "GIGS_DATA_DIR";

/// GIGS test series, each stored in its own subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    /// 2000 series: predefined geodetic objects from the implementation's library.
    Predefined,
    /// 3000 series: objects built by users through factories.
    UserDefined,
    /// 5000 series: coordinate transformations.
    Transformations,
}

impl Series {
    pub fn subdirectory(self) -> &'static str {
        match self {
            Series::Predefined => "2000-predefined",
            Series::UserDefined => "3000-user-defined",
            Series::Transformations => "5000-transformations",
        }
    }
}

/// Resolves dataset file names to paths under a validated root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocator {
    root: PathBuf,
}

impl DatasetLocator {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(DatasetError::Configuration(
                "dataset root directory must be non-empty".to_string(),
            ));
        }
        if !root.is_dir() {
            return Err(DatasetError::Configuration(format!(
                "dataset root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Build a locator from `GIGS_DATA_DIR`.
    pub fn from_env() -> Result<Self, DatasetError> {
        Self::from_var(env::var_os(DATA_DIR_ENV))
    }

    /// Build a locator from the value of `GIGS_DATA_DIR`; unset and empty
    /// are both configuration errors.
    fn from_var(value: Option<OsString>) -> Result<Self, DatasetError> {
        match value {
            Some(value) if !value.is_empty() => Self::new(PathBuf::from(value)),
            _ => Err(DatasetError::Configuration(format!(
                "{DATA_DIR_ENV} is not set"
            ))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, series: Series, file_name: &str) -> PathBuf {
        self.root.join(series.subdirectory()).join(file_name)
    }

    /// Locate and load one dataset table.
    pub fn load(
        &self,
        series: Series,
        file_name: &str,
        columns: &[ColumnType],
    ) -> Result<Table, DatasetError> {
        load(&self.path(series, file_name), columns)
    }
}
