// src/cli/mod.rs
//! CLI definitions for pkgcook
//!
//! The actual command implementations are in the `commands` module.
//! Every command defaults to the built-in loggerd recipe; `--recipe` reads
//! a TOML recipe instead.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pkgcook")]
#[command(author = "pkgcook Contributors")]
#[command(version)]
#[command(about = "Build and package the loggerd daemon from a recipe", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which recipe to use and where its sources live
#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
    /// Path to a TOML recipe file (default: built-in loggerd recipe)
    #[arg(short, long)]
    pub recipe: Option<String>,

    /// Override the recipe's source directory
    #[arg(short, long)]
    pub source: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build, install into the staging tree, and package
    Cook {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Staging root that install writes under
        #[arg(short, long, default_value = "tmp-dest")]
        destdir: String,

        /// Output directory for the package archive
        #[arg(short, long, default_value = "pkg")]
        output: String,

        /// Skip packaging; stop after install
        #[arg(long)]
        no_package: bool,

        /// Keep build directory after completion
        #[arg(long)]
        keep_builddir: bool,

        /// Search path for build tools (default: $PATH)
        #[arg(long)]
        path: Option<String>,
    },

    /// Compile only; prints the build directory for a later `install`
    Build {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Parent directory for the build directory (default: system temp)
        #[arg(long)]
        build_root: Option<String>,

        /// Search path for build tools (default: $PATH)
        #[arg(long)]
        path: Option<String>,
    },

    /// Install the artifacts of an earlier `build` into the staging tree
    Install {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Build directory printed by `build`
        #[arg(short, long)]
        build_dir: String,

        /// Staging root that install writes under
        #[arg(short, long, default_value = "tmp-dest")]
        destdir: String,

        /// Also package the staging tree into this directory
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show package metadata and validate the recipe
    Show {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the installation path for PATH under the recipe's prefix
    Prefix {
        /// Path relative to the prefix (e.g. "bin")
        path: Option<String>,

        /// Path to a TOML recipe file (default: built-in loggerd recipe)
        #[arg(short, long)]
        recipe: Option<String>,
    },
}
