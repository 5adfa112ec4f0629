// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::descriptor::Descriptor;
use crate::recipe::format::RecipeFile;
use std::path::Path;

/// Parse a recipe from a TOML string
///
/// Relative source paths are resolved against `base_dir`.
pub fn parse_recipe(content: &str, base_dir: &Path) -> Result<Descriptor> {
    let file: RecipeFile =
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))?;
    Ok(Descriptor::from_recipe_file(file, base_dir))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Descriptor> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ParseError(format!("Failed to read recipe file {}: {}", path.display(), e))
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_recipe(&content, base_dir)
}

/// Validate a recipe for completeness and correctness
///
/// Hard invariant violations are errors; missing optional metadata is
/// reported as warnings.
pub fn validate_recipe(recipe: &Descriptor) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let metadata = &recipe.metadata;

    metadata.validate()?;

    let step = recipe.build_step();
    if step.compiler.is_empty() {
        return Err(Error::ParseError("Build compiler cannot be empty".to_string()));
    }
    if step.sources.is_empty() {
        return Err(Error::ParseError("Build step names no source files".to_string()));
    }
    if step.artifact.is_empty() {
        return Err(Error::ParseError("Build artifact cannot be empty".to_string()));
    }
    if !recipe.prefix_root().is_absolute() {
        return Err(Error::ParseError(format!(
            "Install prefix must be absolute: {}",
            recipe.prefix_root().display()
        )));
    }

    if metadata.homepage.is_none() {
        warnings.push("Missing package homepage".to_string());
    }
    if metadata.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.bin_files().is_empty() {
        warnings.push("No files listed for install; package will be empty".to_string());
    }
    if !recipe.bin_files().iter().any(|f| f == &step.artifact) {
        warnings.push(format!(
            "Build artifact {} is not installed",
            step.artifact
        ));
    }

    Ok(warnings)
}
