// src/recipe/kitchen/cook.rs

//! Cook: the actual build execution for a single recipe

use crate::error::{Error, Result};
use crate::recipe::descriptor::Recipe;
use crate::recipe::format::staged_path;
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

use super::archive::{copy_source_tree, write_package};
use super::Kitchen;

/// Mode given to installed executables
pub const BIN_MODE: u32 = 0o755;

/// Where a cook keeps its build tree
enum BuildDir {
    /// Removed when the cook is dropped
    Temp(TempDir),
    /// Left on disk
    Kept(PathBuf),
}

impl BuildDir {
    fn path(&self) -> &Path {
        match self {
            Self::Temp(dir) => dir.path(),
            Self::Kept(path) => path,
        }
    }
}

/// A single cook operation
pub struct Cook<'a> {
    pub(super) kitchen: &'a Kitchen,
    pub(super) recipe: &'a dyn Recipe,
    /// Build directory
    build_dir: BuildDir,
    /// Copy of the source tree; the compiler's working directory
    work_dir: PathBuf,
    /// Files written under the staging root
    pub(super) installed: Vec<PathBuf>,
    /// Build log accumulator
    pub(super) log: String,
    /// Warnings
    pub(super) warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(kitchen: &'a Kitchen, recipe: &'a dyn Recipe) -> Result<Self> {
        let prefix = format!("pkgcook-{}-", recipe.metadata().name);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let temp = match &kitchen.config.build_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| Error::Io(io::Error::new(e.kind(), format!("Failed to create build directory: {}", e))))?;

        let build_dir = if kitchen.config.keep_builddir {
            BuildDir::Kept(temp.keep())
        } else {
            BuildDir::Temp(temp)
        };

        Ok(Self::with_build_dir(kitchen, recipe, build_dir))
    }

    /// Pick up a build directory left by an earlier cook
    pub(super) fn resume(kitchen: &'a Kitchen, recipe: &'a dyn Recipe, build_dir: &Path) -> Self {
        Self::with_build_dir(kitchen, recipe, BuildDir::Kept(build_dir.to_path_buf()))
    }

    fn with_build_dir(kitchen: &'a Kitchen, recipe: &'a dyn Recipe, build_dir: BuildDir) -> Self {
        let work_dir = build_dir.path().join("source");
        Self {
            kitchen,
            recipe,
            build_dir,
            work_dir,
            installed: Vec::new(),
            log: String::new(),
            warnings: Vec::new(),
        }
    }

    /// Root of the build tree
    pub fn build_dir(&self) -> &Path {
        self.build_dir.path()
    }

    /// The compiler's working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// The staging root install writes under
    pub fn destdir(&self) -> &Path {
        &self.kitchen.config.destdir
    }

    /// Build directory path if it outlives this cook
    pub(super) fn kept_build_dir(&self) -> Option<PathBuf> {
        match &self.build_dir {
            BuildDir::Kept(path) => Some(path.clone()),
            BuildDir::Temp(_) => None,
        }
    }

    /// Phase 1: Prep - copy the local source tree into the build directory
    pub(super) fn prep(&mut self) -> Result<()> {
        let source = self.recipe.metadata().source_path.clone();
        if !source.is_dir() {
            return Err(Error::SourceNotFound(source));
        }

        let count = copy_source_tree(&source, &self.work_dir)?;
        self.log_line(&format!(
            "Copied {} source file(s) from {}",
            count,
            source.display()
        ));
        Ok(())
    }

    /// Phase 2: Build - run the recipe's build hook
    pub(super) fn build(&mut self) -> Result<()> {
        let recipe = self.recipe;
        recipe.build(self)
    }

    /// Phase 3: Install - run the recipe's install hook
    pub(super) fn install(&mut self) -> Result<()> {
        let recipe = self.recipe;
        recipe.install(self)
    }

    /// Phase 4: Plate - package the files this cook installed
    pub(super) fn plate(&mut self) -> Result<PathBuf> {
        let (recipe, kitchen) = (self.recipe, self.kitchen);
        let metadata = recipe.metadata();
        let config = &kitchen.config;

        fs::create_dir_all(&config.output_dir).map_err(|e| {
            Error::PackageFailure(format!(
                "Failed to create output directory {}: {}",
                config.output_dir.display(),
                e
            ))
        })?;

        let package_path = config
            .output_dir
            .join(format!("{}.tar.gz", metadata.full_name()));
        let manifest = write_package(
            metadata,
            &config.destdir,
            &self.installed,
            &package_path,
            config.source_date_epoch,
        )?;

        self.log_line(&format!(
            "Created package: {} ({} files)",
            package_path.display(),
            manifest.files.len()
        ));
        info!(
            "Plated: {} ({} files)",
            package_path.display(),
            manifest.files.len()
        );

        Ok(package_path)
    }

    /// Run a build tool in the working directory
    ///
    /// The tool's stdout and stderr are kept verbatim in the error on failure.
    /// Output from a successful run is recorded as a warning.
    pub fn run_tool(&mut self, program: &str, args: &[String]) -> Result<()> {
        let command = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        info!("Running: {}", command);

        let tool = self
            .kitchen
            .locate_tool(program, &self.work_dir)
            .map_err(|e| Error::CompileFailure {
                command: command.clone(),
                status: "not found".to_string(),
                stdout: String::new(),
                stderr: format!("{}: {}", program, e),
            })?;
        debug!("Resolved {} to {}", program, tool.display());

        let output = Command::new(&tool)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| Error::CompileFailure {
                command: command.clone(),
                status: "not started".to_string(),
                stdout: String::new(),
                stderr: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        self.log_build_output(&command, &stdout, &stderr);

        if !output.status.success() {
            return Err(Error::CompileFailure {
                command,
                status: output.status.to_string(),
                stdout: stdout.into_owned(),
                stderr: stderr.into_owned(),
            });
        }

        let diagnostics = format!("{}{}", stdout, stderr);
        let diagnostics = diagnostics.trim_end();
        if !diagnostics.is_empty() {
            warn!("{} reported:\n{}", program, diagnostics);
            self.warnings.push(format!("{}: {}", program, diagnostics));
        }

        Ok(())
    }

    /// Install a build output into `<prefix>/bin`
    pub fn install_bin(&mut self, file: &str) -> Result<PathBuf> {
        let bin_dir = self.recipe.prefix(Some(Path::new("bin")));
        let source = self.work_dir.join(file);
        self.install_file(&source, &bin_dir, BIN_MODE)
    }

    /// Install a file into `install_dir` (an absolute path) under the staging root
    ///
    /// The copy is all-or-nothing: the file is written to a temporary name in
    /// the target directory and renamed into place once complete.
    pub fn install_file(&mut self, source: &Path, install_dir: &Path, mode: u32) -> Result<PathBuf> {
        let file_name = source
            .file_name()
            .ok_or_else(|| Error::install(source, "source has no file name"))?;

        if !source.is_file() {
            return Err(Error::install(
                source,
                "build artifact not found (did the build step run?)",
            ));
        }

        let target_dir = staged_path(self.destdir(), install_dir)?;
        let target = target_dir.join(file_name);

        copy_atomic(source, &target_dir, &target, mode)?;

        info!("Installed {}", install_dir.join(file_name).display());
        self.log_line(&format!("Installed {} -> {}", source.display(), target.display()));
        self.installed.push(target.clone());

        Ok(target)
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log tool output (stdout/stderr) with a command header
    fn log_build_output(&mut self, command: &str, stdout: &str, stderr: &str) {
        self.log_line(&format!("=== {} ===", command));
        if !stdout.is_empty() {
            self.log.push_str(stdout);
            self.log.push('\n');
        }
        if !stderr.is_empty() {
            self.log.push_str(stderr);
            self.log.push('\n');
        }
    }
}

/// Copy `source` to `target` through a temporary file in `target_dir`
fn copy_atomic(source: &Path, target_dir: &Path, target: &Path, mode: u32) -> Result<()> {
    fs::create_dir_all(target_dir).map_err(|e| Error::install(target_dir, e))?;

    // Removed on drop unless persisted
    let mut staged = NamedTempFile::new_in(target_dir).map_err(|e| Error::install(target_dir, e))?;

    let mut input = fs::File::open(source).map_err(|e| Error::install(source, e))?;
    io::copy(&mut input, staged.as_file_mut()).map_err(|e| Error::install(target, e))?;

    staged
        .as_file()
        .set_permissions(fs::Permissions::from_mode(mode))
        .map_err(|e| Error::install(target, e))?;
    staged.as_file().sync_all().map_err(|e| Error::install(target, e))?;

    staged
        .persist(target)
        .map_err(|e| Error::install(target, e.error))?;

    Ok(())
}
