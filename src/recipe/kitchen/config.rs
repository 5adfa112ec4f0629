// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen build system

use std::ffi::OsString;
use std::path::PathBuf;

/// Default archive timestamp (2024-01-01 00:00:00 UTC)
pub const DEFAULT_SOURCE_DATE_EPOCH: u64 = 1704067200;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Parent directory for temporary build directories (None = system temp)
    pub build_root: Option<PathBuf>,
    /// Staging root that install writes under
    pub destdir: PathBuf,
    /// Directory the package archive is written to
    pub output_dir: PathBuf,
    /// Search path used to locate build tools (None = inherited `PATH`)
    pub search_path: Option<OsString>,
    /// Keep build directory after completion (for debugging or a later install)
    pub keep_builddir: bool,
    /// Package the staged tree after install
    pub package: bool,
    /// Timestamp written into package archive entries
    pub source_date_epoch: u64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            build_root: None,
            destdir: PathBuf::from("tmp-dest"),
            output_dir: PathBuf::from("pkg"),
            search_path: None,
            keep_builddir: false,
            package: true,
            source_date_epoch: DEFAULT_SOURCE_DATE_EPOCH,
        }
    }
}

impl KitchenConfig {
    /// Create a configuration staging under `destdir` and writing packages to `output_dir`
    pub fn new(destdir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            destdir: destdir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Only build and install, skip packaging
    pub fn without_package(mut self) -> Self {
        self.package = false;
        self
    }

    /// Locate build tools on this search path instead of `PATH`
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Stamp package archive entries with this time
    pub fn with_source_date_epoch(mut self, epoch: u64) -> Self {
        self.source_date_epoch = epoch;
        self
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Files written under the staging root
    pub installed: Vec<PathBuf>,
    /// Path to the package archive, if packaging was enabled
    pub package_path: Option<PathBuf>,
    /// Build directory, if it was kept
    pub build_dir: Option<PathBuf>,
    /// Build log
    pub log: String,
    /// Warnings generated during the cook
    pub warnings: Vec<String>,
}
