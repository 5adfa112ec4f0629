// src/error.rs

//! Error types for recipe cooking

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while validating, building, installing or packaging a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// The compiler could not be run, exited non-zero, or produced no artifact
    ///
    /// `stdout` and `stderr` hold the tool's output verbatim.
    #[error("Compile failed: `{command}` ({status})\n{stdout}{stderr}")]
    CompileFailure {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// The artifact was missing or could not be written to its destination
    #[error("Install failed for {path}: {reason}")]
    InstallFailure { path: PathBuf, reason: String },

    /// Package metadata violates an invariant
    #[error("Invalid package metadata: {0}")]
    InvalidMetadata(String),

    /// The recipe's local source tree does not exist
    #[error("Source path not found: {0}")]
    SourceNotFound(PathBuf),

    /// A recipe file could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The staged tree could not be packaged
    #[error("Packaging failed: {0}")]
    PackageFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for failures raised by the build hook
    pub fn is_compile_failure(&self) -> bool {
        matches!(self, Self::CompileFailure { .. })
    }

    /// True for failures raised by the install hook
    pub fn is_install_failure(&self) -> bool {
        matches!(self, Self::InstallFailure { .. })
    }

    pub(crate) fn install(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InstallFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
