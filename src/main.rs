// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cook {
            recipe,
            destdir,
            output,
            no_package,
            keep_builddir,
            path,
        } => commands::cmd_cook(
            recipe.recipe.as_deref(),
            recipe.source.as_deref(),
            &destdir,
            &output,
            no_package,
            keep_builddir,
            path.as_deref(),
        ),
        Commands::Build {
            recipe,
            build_root,
            path,
        } => commands::cmd_build(
            recipe.recipe.as_deref(),
            recipe.source.as_deref(),
            build_root.as_deref(),
            path.as_deref(),
        ),
        Commands::Install {
            recipe,
            build_dir,
            destdir,
            output,
        } => commands::cmd_install(
            recipe.recipe.as_deref(),
            recipe.source.as_deref(),
            &build_dir,
            &destdir,
            output.as_deref(),
        ),
        Commands::Show { recipe, json } => {
            commands::cmd_show(recipe.recipe.as_deref(), recipe.source.as_deref(), json)
        }
        Commands::Prefix { path, recipe } => commands::cmd_prefix(path.as_deref(), recipe.as_deref()),
    }
}
