// src/recipe/format.rs

//! Recipe metadata and file format definitions
//!
//! Recipes are either built in (constructed from static literals) or read
//! from a TOML file of the following shape:
//!
//! ```toml
//! [package]
//! name = "loggerd"
//! version = "1.0.0"
//! revision = "1"
//! homepage = "https://github.com/codekitchen/loggerd"
//! description = "logger.c ported to D, with no maximum line length"
//!
//! [source]
//! path = "../src"
//!
//! [build]
//! compiler = "dmd"
//! flags = ["-O", "-inline", "-release"]
//! sources = ["loggerd.d"]
//! artifact = "loggerd"
//!
//! [install]
//! prefix = "/usr/local"
//! bin = ["loggerd"]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Installation root used when a recipe does not name one
pub const DEFAULT_PREFIX: &str = "/usr/local";

/// Identity of the package being cooked
///
/// Constructed once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    /// Build iteration of the same upstream version
    pub revision: String,
    pub homepage: Option<String>,
    pub description: Option<String>,
    /// Local source tree the build reads from
    pub source_path: PathBuf,
}

impl PackageMetadata {
    /// Check the metadata invariants
    ///
    /// `source_path` existence is a build-time check and is not done here.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidMetadata("package name cannot be empty".to_string()));
        }
        if self.name.contains(['/', '\\']) || self.name == "." || self.name == ".." {
            return Err(Error::InvalidMetadata(format!(
                "package name is not a valid file name: {}",
                self.name
            )));
        }
        if self.version.is_empty() {
            return Err(Error::InvalidMetadata("package version cannot be empty".to_string()));
        }
        semver::Version::parse(&self.version).map_err(|e| {
            Error::InvalidMetadata(format!("version {} is not a semantic version: {}", self.version, e))
        })?;
        if self.revision.is_empty() {
            return Err(Error::InvalidMetadata("package revision cannot be empty".to_string()));
        }
        if let Some(homepage) = &self.homepage {
            url::Url::parse(homepage).map_err(|e| {
                Error::InvalidMetadata(format!("homepage {} is not a URL: {}", homepage, e))
            })?;
        }
        Ok(())
    }

    /// `<name>-<version>-<revision>`, the stem of the package file
    pub fn full_name(&self) -> String {
        format!("{}-{}-{}", self.name, self.version, self.revision)
    }
}

/// One compiler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    /// Compiler program, looked up on the search path
    pub compiler: String,

    /// Fixed flags passed before the source files
    #[serde(default)]
    pub flags: Vec<String>,

    /// Source file names, relative to the source tree
    pub sources: Vec<String>,

    /// File the compiler writes into its working directory
    pub artifact: String,
}

impl BuildStep {
    /// Full argument list: flags followed by sources
    pub fn args(&self) -> Vec<String> {
        self.flags.iter().chain(self.sources.iter()).cloned().collect()
    }

    /// The command line as it would be typed in a shell (for logs and errors)
    pub fn command_line(&self) -> String {
        std::iter::once(self.compiler.as_str())
            .chain(self.flags.iter().map(String::as_str))
            .chain(self.sources.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A recipe as read from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    pub package: PackageSection,
    pub source: SourceSection,
    pub build: BuildStep,
    #[serde(default)]
    pub install: InstallSection,
}

/// `[package]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,
    pub version: String,

    #[serde(default = "default_revision")]
    pub revision: String,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

fn default_revision() -> String {
    "1".to_string()
}

/// `[source]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Local source tree; relative paths are resolved against the recipe file's directory
    pub path: PathBuf,
}

/// `[install]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSection {
    #[serde(default = "default_prefix")]
    pub prefix: PathBuf,

    /// Build outputs copied into `<prefix>/bin`
    #[serde(default)]
    pub bin: Vec<String>,
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            bin: Vec::new(),
        }
    }
}

fn default_prefix() -> PathBuf {
    PathBuf::from(DEFAULT_PREFIX)
}

/// Map an absolute install path to its location under a staging root
///
/// `/usr/local/bin/loggerd` staged under `/tmp/dest` becomes
/// `/tmp/dest/usr/local/bin/loggerd`. Paths that climb out with `..` are rejected.
pub fn staged_path(destdir: &Path, install_path: &Path) -> Result<PathBuf> {
    let mut staged = destdir.to_path_buf();
    for component in install_path.components() {
        match component {
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            Component::Normal(part) => staged.push(part),
            Component::ParentDir => {
                return Err(Error::install(
                    install_path,
                    "install path escapes the staging directory",
                ));
            }
        }
    }
    Ok(staged)
}
