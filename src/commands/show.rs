// src/commands/show.rs

//! Metadata and prefix queries

use anyhow::{Context, Result};
use pkgcook::{validate_recipe, Recipe};
use std::path::Path;

use super::load_recipe;

/// Print package metadata and recipe warnings
pub fn cmd_show(recipe_path: Option<&str>, source: Option<&str>, json: bool) -> Result<()> {
    let recipe = load_recipe(recipe_path, source)?;
    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;
    let metadata = recipe.metadata();

    if json {
        let output = serde_json::json!({
            "package": metadata,
            "build": recipe.build_step(),
            "prefix": recipe.prefix(None),
            "bin": recipe.bin_files(),
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Name:        {}", metadata.name);
    println!("Version:     {}", metadata.version);
    println!("Revision:    {}", metadata.revision);
    println!("Homepage:    {}", metadata.homepage.as_deref().unwrap_or("(none)"));
    println!("Description: {}", metadata.description.as_deref().unwrap_or("(none)"));
    println!("Source:      {}", metadata.source_path.display());
    println!("Build:       {}", recipe.build_step().command_line());
    println!("Prefix:      {}", recipe.prefix(None).display());
    for file in recipe.bin_files() {
        println!(
            "Installs:    {}",
            recipe.prefix(Some(Path::new("bin"))).join(file).display()
        );
    }

    for warning in &warnings {
        println!("Warning: {}", warning);
    }
    Ok(())
}

/// Print `<prefix>/<path>` for the recipe
pub fn cmd_prefix(path: Option<&str>, recipe_path: Option<&str>) -> Result<()> {
    let recipe = load_recipe(recipe_path, None)?;
    println!("{}", recipe.prefix(path.map(Path::new)).display());
    Ok(())
}
