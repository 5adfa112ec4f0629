// src/commands/mod.rs
//! Command handlers for the pkgcook CLI

mod cook;
mod show;

pub use cook::{cmd_build, cmd_cook, cmd_install};
pub use show::{cmd_prefix, cmd_show};

use anyhow::{Context, Result};
use pkgcook::recipe::kitchen::DEFAULT_SOURCE_DATE_EPOCH;
use pkgcook::{parse_recipe_file, Descriptor};
use std::path::Path;

/// Source directory of the built-in recipe when `--source` is not given
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Load the recipe named on the command line, or the built-in loggerd recipe
pub fn load_recipe(recipe_path: Option<&str>, source: Option<&str>) -> Result<Descriptor> {
    let recipe = match recipe_path {
        Some(path) => {
            let path = Path::new(path);
            parse_recipe_file(path)
                .with_context(|| format!("Failed to parse recipe: {}", path.display()))?
        }
        None => Descriptor::loggerd(DEFAULT_SOURCE_DIR),
    };

    Ok(match source {
        Some(dir) => recipe.with_source_path(dir),
        None => recipe,
    })
}

/// Archive timestamp from `SOURCE_DATE_EPOCH`, or the fixed default
pub fn source_date_epoch() -> u64 {
    parse_source_date_epoch(std::env::var("SOURCE_DATE_EPOCH").ok().as_deref())
}

fn parse_source_date_epoch(value: Option<&str>) -> u64 {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SOURCE_DATE_EPOCH)
}
