// src/recipe/kitchen/manifest.rs

//! Package manifest written alongside the staged files

use crate::error::{Error, Result};
use crate::hash::sha256_file;
use crate::recipe::format::PackageMetadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// File name of the manifest inside the package archive
pub const MANIFEST_FILE: &str = "MANIFEST.toml";

/// Human-readable description of a package archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub package: ManifestPackage,
    #[serde(default)]
    pub files: Vec<ManifestFile>,
}

/// `[package]` table of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPackage {
    pub name: String,
    pub version: String,
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One `[[files]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Absolute install path (e.g. `/usr/local/bin/loggerd`)
    pub path: String,
    pub size: u64,
    pub mode: u32,
    pub sha256: String,
}

impl PackageManifest {
    /// Describe the given files, each a path under the staging root
    ///
    /// Entries are sorted by path; anything else under `destdir` is ignored.
    pub fn from_installed(
        metadata: &PackageMetadata,
        destdir: &Path,
        installed: &[PathBuf],
    ) -> Result<Self> {
        let mut files = Vec::with_capacity(installed.len());

        for path in staged_relative(destdir, installed)? {
            let full = destdir.join(&path);
            let meta = fs::metadata(&full)
                .map_err(|e| Error::PackageFailure(format!("{}: {}", full.display(), e)))?;

            files.push(ManifestFile {
                path: format!("/{}", path.display()),
                size: meta.len(),
                mode: meta.permissions().mode() & 0o7777,
                sha256: sha256_file(&full)?,
            });
        }

        Ok(Self {
            package: ManifestPackage {
                name: metadata.name.clone(),
                version: metadata.version.clone(),
                revision: metadata.revision.clone(),
                homepage: metadata.homepage.clone(),
                description: metadata.description.clone(),
            },
            files,
        })
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::PackageFailure(format!("Failed to serialize manifest: {}", e)))
    }

    /// Parse from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid manifest: {}", e)))
    }
}

/// Installed paths relative to `destdir`, sorted and deduplicated
pub(crate) fn staged_relative(destdir: &Path, installed: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut relative = installed
        .iter()
        .map(|path| {
            path.strip_prefix(destdir)
                .map(Path::to_path_buf)
                .map_err(|_| {
                    Error::PackageFailure(format!(
                        "{} is outside the staging root {}",
                        path.display(),
                        destdir.display()
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    relative.sort();
    relative.dedup();
    Ok(relative)
}
