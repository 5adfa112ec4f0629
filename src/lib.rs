// src/lib.rs

//! pkgcook: recipe-driven build and packaging
//!
//! Builds the loggerd daemon from a local source tree with a fixed compiler
//! invocation, installs the binary under `/usr/local/bin` in a staging tree,
//! and packages the staged tree as a `.tar.gz` with a manifest.
//!
//! # Architecture
//!
//! - Recipes: immutable metadata plus `build`/`install`/`prefix` hooks
//! - Kitchen: the driver that calls the hooks in order
//! - Installs are all-or-nothing (temp file, then rename)

mod error;
pub mod hash;
pub mod recipe;

pub use error::{Error, Result};
pub use recipe::{
    parse_recipe, parse_recipe_file, validate_recipe, Cook, CookResult, Descriptor, Kitchen,
    KitchenConfig, PackageMetadata, Recipe,
};
