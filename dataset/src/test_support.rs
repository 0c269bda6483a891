//! Test-only helpers for writing dataset fixtures to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::io::locator::{DatasetLocator, Series};

/// A temporary dataset root with per-series subdirectories.
pub struct TempDataset {
    dir: TempDir,
}

impl TempDataset {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dataset root")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` as `file_name` inside the series directory.
    pub fn write(&self, series: Series, file_name: &str, contents: &str) -> Result<PathBuf> {
        let dir = self.dir.path().join(series.subdirectory());
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(file_name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn locator(&self) -> Result<DatasetLocator> {
        DatasetLocator::new(self.dir.path()).context("dataset locator")
    }
}

/// Join cells with tabs into one dataset line.
pub fn line(cells: &[&str]) -> String {
    cells.join("\t")
}
