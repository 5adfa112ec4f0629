// src/recipe/mod.rs

//! Recipe system for building packages from a local source tree
//!
//! A recipe carries the package identity and three hooks:
//! - **build**: compile the sources in the build directory
//! - **install**: copy the build outputs into the staging tree
//! - **prefix**: resolve paths under the installation root (`/usr/local`)
//!
//! The [`Kitchen`] is the driver. It calls `build` and then `install`, and
//! packages the staged tree afterwards.
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "loggerd"
//! version = "1.0.0"
//! revision = "1"
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
//! bin = ["loggerd"]
//! ```

mod descriptor;
mod format;
pub mod kitchen;
pub mod parser;

pub use descriptor::{Descriptor, Recipe};
pub use format::{
    staged_path, BuildStep, InstallSection, PackageMetadata, PackageSection, RecipeFile,
    SourceSection, DEFAULT_PREFIX,
};
pub use kitchen::{Cook, CookResult, Kitchen, KitchenConfig, PackageManifest};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
