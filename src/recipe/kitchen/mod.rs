// src/recipe/kitchen/mod.rs

//! Kitchen: the driver that cooks recipes
//!
//! The Kitchen owns the configuration for a run and calls a recipe's hooks
//! in a fixed order:
//! - Prep: copy the local source tree into a fresh build directory
//! - Build: the recipe's compile step, run inside that directory
//! - Install: the recipe's install step, staged under the destdir
//! - Plate: package the staged tree (optional)
//!
//! Every failure is fatal; nothing is retried.

mod archive;
mod config;
mod cook;
pub mod manifest;

pub use archive::{copy_source_tree, write_package};
pub use config::{CookResult, KitchenConfig, DEFAULT_SOURCE_DATE_EPOCH};
pub use cook::{Cook, BIN_MODE};
pub use manifest::{ManifestFile, ManifestPackage, PackageManifest, MANIFEST_FILE};

use crate::error::{Error, Result};
use crate::recipe::descriptor::Recipe;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
}

impl Kitchen {
    /// Create a new Kitchen with the given configuration
    pub fn new(config: KitchenConfig) -> Self {
        Self { config }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Check everything that must hold before the build starts
    pub fn check(&self, recipe: &dyn Recipe) -> Result<()> {
        let metadata = recipe.metadata();
        metadata.validate()?;

        if !metadata.source_path.is_dir() {
            return Err(Error::SourceNotFound(metadata.source_path.clone()));
        }
        Ok(())
    }

    /// Cook a recipe: prep, build, install, then plate if enabled
    ///
    /// `install` is never reached when `build` fails.
    pub fn cook(&self, recipe: &dyn Recipe) -> Result<CookResult> {
        let metadata = recipe.metadata();
        info!(
            "Cooking {} version {}-{}",
            metadata.name, metadata.version, metadata.revision
        );

        self.check(recipe)?;

        let mut cook = Cook::new(self, recipe)?;
        debug!("Build directory: {}", cook.build_dir().display());

        info!("Prep: copying sources...");
        cook.prep()?;

        info!("Building...");
        cook.build()?;

        info!("Installing into {}...", self.config.destdir.display());
        cook.install()?;

        if cook.installed.is_empty() {
            cook.warnings
                .push("Install step placed no files in the staging tree".to_string());
        }

        let package_path = if self.config.package {
            info!("Plating: creating package...");
            Some(cook.plate()?)
        } else {
            None
        };

        let build_dir = cook.kept_build_dir();
        Ok(CookResult {
            installed: cook.installed,
            package_path,
            build_dir,
            log: cook.log,
            warnings: cook.warnings,
        })
    }

    /// Run prep and build only, leaving the build directory for a later install
    ///
    /// Returns the build directory.
    pub fn build(&self, recipe: &dyn Recipe) -> Result<PathBuf> {
        self.check(recipe)?;

        let kitchen = Kitchen::new(KitchenConfig {
            keep_builddir: true,
            ..self.config.clone()
        });
        let mut cook = Cook::new(&kitchen, recipe)?;
        cook.prep()?;
        cook.build()?;

        let build_dir = cook.build_dir().to_path_buf();
        info!("Built {} in {}", recipe.metadata().name, build_dir.display());
        Ok(build_dir)
    }

    /// Run install (and plate if enabled) against an existing build directory
    pub fn install(&self, recipe: &dyn Recipe, build_dir: &Path) -> Result<CookResult> {
        recipe.metadata().validate()?;

        let mut cook = Cook::resume(self, recipe, build_dir);
        cook.install()?;

        let package_path = if self.config.package {
            Some(cook.plate()?)
        } else {
            None
        };

        Ok(CookResult {
            installed: cook.installed,
            package_path,
            build_dir: Some(build_dir.to_path_buf()),
            log: cook.log,
            warnings: cook.warnings,
        })
    }

    /// Locate a build tool on the configured search path
    pub(crate) fn locate_tool(&self, program: &str, cwd: &Path) -> std::result::Result<PathBuf, which::Error> {
        match &self.config.search_path {
            Some(path) => which::which_in(program, Some(path), cwd),
            None => which::which(program),
        }
    }
}
