// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .short('r')
        .long("recipe")
        .value_name("FILE")
        .help("Path to a TOML recipe file (default: built-in loggerd recipe)")
}

/// Common argument: source directory override
fn source_arg() -> Arg {
    Arg::new("source")
        .short('s')
        .long("source")
        .value_name("DIR")
        .help("Override the recipe's source directory")
}

/// Common argument: staging root
fn destdir_arg() -> Arg {
    Arg::new("destdir")
        .short('d')
        .long("destdir")
        .default_value("tmp-dest")
        .help("Staging root that install writes under")
}

/// Common argument: tool search path
fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .value_name("PATH")
        .help("Search path for build tools (default: $PATH)")
}

fn build_cli() -> Command {
    Command::new("pkgcook")
        .version(env!("CARGO_PKG_VERSION"))
        .author("pkgcook Contributors")
        .about("Build and package the loggerd daemon from a recipe")
        .subcommand_required(true)
        .subcommand(
            Command::new("cook")
                .about("Build, install into the staging tree, and package")
                .arg(recipe_arg())
                .arg(source_arg())
                .arg(destdir_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value("pkg")
                        .help("Output directory for the package archive"),
                )
                .arg(
                    Arg::new("no_package")
                        .long("no-package")
                        .action(ArgAction::SetTrue)
                        .help("Skip packaging; stop after install"),
                )
                .arg(
                    Arg::new("keep_builddir")
                        .long("keep-builddir")
                        .action(ArgAction::SetTrue)
                        .help("Keep build directory after completion"),
                )
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Compile only; prints the build directory for a later install")
                .arg(recipe_arg())
                .arg(source_arg())
                .arg(
                    Arg::new("build_root")
                        .long("build-root")
                        .help("Parent directory for the build directory"),
                )
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("install")
                .about("Install the artifacts of an earlier build into the staging tree")
                .arg(recipe_arg())
                .arg(source_arg())
                .arg(
                    Arg::new("build_dir")
                        .short('b')
                        .long("build-dir")
                        .required(true)
                        .help("Build directory printed by build"),
                )
                .arg(destdir_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Also package the staging tree into this directory"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show package metadata and validate the recipe")
                .arg(recipe_arg())
                .arg(source_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("prefix")
                .about("Print the installation path under the recipe's prefix")
                .arg(Arg::new("path").help("Path relative to the prefix (e.g. bin)"))
                .arg(recipe_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pkgcook.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
