// src/recipe/descriptor.rs

//! Recipe lifecycle hooks and the compile-and-install descriptor

use crate::error::{Error, Result};
use crate::recipe::format::{
    BuildStep, InstallSection, PackageMetadata, RecipeFile, DEFAULT_PREFIX,
};
use crate::recipe::kitchen::Cook;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lifecycle hooks the Kitchen calls while cooking
///
/// The Kitchen always calls `build` before `install`, once each, and never
/// calls `install` after a failed `build`.
pub trait Recipe {
    /// Package identity
    fn metadata(&self) -> &PackageMetadata;

    /// Produce build artifacts in the cook's working directory
    fn build(&self, cook: &mut Cook<'_>) -> Result<()>;

    /// Place build artifacts into the staging tree
    fn install(&self, cook: &mut Cook<'_>) -> Result<()>;

    /// Join the installation root with an optional relative path
    fn prefix(&self, path: Option<&Path>) -> PathBuf {
        let root = PathBuf::from(DEFAULT_PREFIX);
        match path {
            Some(p) => root.join(p),
            None => root,
        }
    }
}

/// A recipe that compiles with one compiler invocation and installs binaries
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub metadata: PackageMetadata,
    build: BuildStep,
    install: InstallSection,
}

impl Descriptor {
    pub const LOGGERD_NAME: &'static str = "loggerd";
    pub const LOGGERD_VERSION: &'static str = "1.0.0";
    pub const LOGGERD_REVISION: &'static str = "1";
    pub const LOGGERD_HOMEPAGE: &'static str = "https://github.com/codekitchen/loggerd";
    pub const LOGGERD_DESCRIPTION: &'static str =
        "logger.c ported to D, with no maximum line length";

    /// Build a descriptor from its parts
    pub fn new(metadata: PackageMetadata, build: BuildStep, install: InstallSection) -> Self {
        Self {
            metadata,
            build,
            install,
        }
    }

    /// The built-in loggerd recipe
    ///
    /// Compiles `loggerd.d` with `dmd -O -inline -release` and installs the
    /// resulting `loggerd` binary into `/usr/local/bin`.
    pub fn loggerd(source_path: impl Into<PathBuf>) -> Self {
        let metadata = PackageMetadata {
            name: Self::LOGGERD_NAME.to_string(),
            version: Self::LOGGERD_VERSION.to_string(),
            revision: Self::LOGGERD_REVISION.to_string(),
            homepage: Some(Self::LOGGERD_HOMEPAGE.to_string()),
            description: Some(Self::LOGGERD_DESCRIPTION.to_string()),
            source_path: source_path.into(),
        };

        let build = BuildStep {
            compiler: "dmd".to_string(),
            flags: vec!["-O".to_string(), "-inline".to_string(), "-release".to_string()],
            sources: vec!["loggerd.d".to_string()],
            artifact: Self::LOGGERD_NAME.to_string(),
        };

        let install = InstallSection {
            prefix: PathBuf::from(DEFAULT_PREFIX),
            bin: vec![Self::LOGGERD_NAME.to_string()],
        };

        Self::new(metadata, build, install)
    }

    /// Build a descriptor from a parsed recipe file
    pub fn from_recipe_file(file: RecipeFile, base_dir: &Path) -> Self {
        let source_path = if file.source.path.is_absolute() {
            file.source.path
        } else {
            base_dir.join(file.source.path)
        };

        let metadata = PackageMetadata {
            name: file.package.name,
            version: file.package.version,
            revision: file.package.revision,
            homepage: file.package.homepage,
            description: file.package.description,
            source_path,
        };

        Self::new(metadata, file.build, file.install)
    }

    /// The same recipe reading from a different source tree
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.metadata.source_path = source_path.into();
        self
    }

    pub fn build_step(&self) -> &BuildStep {
        &self.build
    }

    pub fn bin_files(&self) -> &[String] {
        &self.install.bin
    }

    pub fn prefix_root(&self) -> &Path {
        &self.install.prefix
    }
}

impl Recipe for Descriptor {
    fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    fn build(&self, cook: &mut Cook<'_>) -> Result<()> {
        cook.run_tool(&self.build.compiler, &self.build.args())?;

        let artifact = cook.work_dir().join(&self.build.artifact);
        if !artifact.is_file() {
            return Err(Error::CompileFailure {
                command: self.build.command_line(),
                status: "exit status: 0".to_string(),
                stdout: String::new(),
                stderr: format!("expected artifact {} was not produced", artifact.display()),
            });
        }
        debug!("Built artifact: {}", artifact.display());

        Ok(())
    }

    fn install(&self, cook: &mut Cook<'_>) -> Result<()> {
        for file in &self.install.bin {
            cook.install_bin(file)?;
        }
        Ok(())
    }

    fn prefix(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(p) => self.install.prefix.join(p),
            None => self.install.prefix.clone(),
        }
    }
}
