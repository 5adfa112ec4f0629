// src/commands/cook.rs

//! Cook, build and install commands

use anyhow::{Context, Result};
use pkgcook::{validate_recipe, CookResult, Kitchen, KitchenConfig, Recipe};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{load_recipe, source_date_epoch};

/// Build, install, and package a recipe
///
/// # Arguments
/// * `recipe_path` - Path to a recipe file (None = built-in loggerd)
/// * `source` - Override for the recipe's source directory
/// * `destdir` - Staging root for install
/// * `output_dir` - Output directory for the package
/// * `no_package` - Stop after install
/// * `keep_builddir` - Keep build directory after completion
/// * `search_path` - Search path for build tools
pub fn cmd_cook(
    recipe_path: Option<&str>,
    source: Option<&str>,
    destdir: &str,
    output_dir: &str,
    no_package: bool,
    keep_builddir: bool,
    search_path: Option<&str>,
) -> Result<()> {
    let recipe = load_recipe(recipe_path, source)?;
    let metadata = recipe.metadata();

    println!(
        "Recipe: {} version {}-{}",
        metadata.name, metadata.version, metadata.revision
    );

    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let mut config =
        KitchenConfig::new(destdir, output_dir).with_source_date_epoch(source_date_epoch());
    config.package = !no_package;
    config.keep_builddir = keep_builddir;
    if let Some(path) = search_path {
        config = config.with_search_path(path);
    }

    let kitchen = Kitchen::new(config);
    let result = kitchen
        .cook(&recipe)
        .with_context(|| format!("Failed to cook {}", metadata.name))?;

    print_result(&result);

    info!("Successfully cooked {}", metadata.name);
    Ok(())
}

/// Compile a recipe and print the build directory
pub fn cmd_build(
    recipe_path: Option<&str>,
    source: Option<&str>,
    build_root: Option<&str>,
    search_path: Option<&str>,
) -> Result<()> {
    let recipe = load_recipe(recipe_path, source)?;
    validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;

    let mut config = KitchenConfig {
        build_root: build_root.map(PathBuf::from),
        ..Default::default()
    };
    if let Some(path) = search_path {
        config = config.with_search_path(path);
    }

    let build_dir = Kitchen::new(config)
        .build(&recipe)
        .with_context(|| format!("Failed to build {}", recipe.metadata().name))?;

    println!("[COMPLETE] Built {}", recipe.metadata().name);
    println!("{}", build_dir.display());
    Ok(())
}

/// Install the outputs of an earlier build
pub fn cmd_install(
    recipe_path: Option<&str>,
    source: Option<&str>,
    build_dir: &str,
    destdir: &str,
    output_dir: Option<&str>,
) -> Result<()> {
    let recipe = load_recipe(recipe_path, source)?;

    let mut config = KitchenConfig::new(destdir, output_dir.unwrap_or("pkg"))
        .with_source_date_epoch(source_date_epoch());
    config.package = output_dir.is_some();

    let result = Kitchen::new(config)
        .install(&recipe, Path::new(build_dir))
        .with_context(|| format!("Failed to install {}", recipe.metadata().name))?;

    print_result(&result);
    Ok(())
}

fn print_result(result: &CookResult) {
    debug!("Build log:\n{}", result.log);

    for path in &result.installed {
        println!("Installed: {}", path.display());
    }

    if let Some(package) = &result.package_path {
        println!("\n[COMPLETE] Packaged: {}", package.display());
    }

    if let Some(build_dir) = &result.build_dir {
        println!("Build directory: {}", build_dir.display());
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
}
