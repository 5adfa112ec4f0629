// src/recipe/kitchen/archive.rs

//! Source tree and package archive utilities for the Kitchen

use crate::error::{Error, Result};
use crate::recipe::format::PackageMetadata;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tar::{Builder, EntryType, Header};
use tracing::debug;
use walkdir::WalkDir;

use super::manifest::{staged_relative, PackageManifest, MANIFEST_FILE};

/// Copy a local source tree into the build directory
///
/// Directories and file modes are preserved, symlinks are recreated as
/// symlinks. Returns the number of regular files copied.
pub fn copy_source_tree(source: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            Error::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("filesystem loop in source tree")
            }))
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())?;
            std::os::unix::fs::symlink(&link, &target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!("Copied {} file(s) into {}", copied, dest.display());
    Ok(copied)
}

/// Package the installed files into a gzipped tarball at `output_path`
///
/// Only `installed` (paths under `destdir`) and their parent directories go
/// into the archive; anything else left in the staging root is not packaged.
/// Entries are sorted and carry a fixed `mtime` and root ownership, so the
/// same files always yield the same archive. The archive is written to a
/// temporary file next to `output_path` and renamed into place.
pub fn write_package(
    metadata: &PackageMetadata,
    destdir: &Path,
    installed: &[PathBuf],
    output_path: &Path,
    mtime: u64,
) -> Result<PackageManifest> {
    let manifest = PackageManifest::from_installed(metadata, destdir, installed)?;
    let manifest_toml = manifest.to_toml()?;

    // true = directory
    let mut entries = BTreeMap::new();
    for path in staged_relative(destdir, installed)? {
        for parent in path.ancestors().skip(1) {
            if !parent.as_os_str().is_empty() {
                entries.insert(parent.to_path_buf(), true);
            }
        }
        entries.insert(path, false);
    }

    let output_dir = output_path.parent().unwrap_or_else(|| Path::new("."));
    let staged = tempfile::NamedTempFile::new_in(output_dir)?;

    let encoder = GzEncoder::new(staged.as_file(), Compression::default());
    let mut archive = Builder::new(encoder);

    append_data(&mut archive, MANIFEST_FILE, 0o644, mtime, manifest_toml.as_bytes())?;

    for (relative, is_dir) in &entries {
        if *is_dir {
            let mut header = header_for(EntryType::Directory, 0o755, 0, mtime);
            archive.append_data(&mut header, relative, std::io::empty())?;
            continue;
        }

        let full = destdir.join(relative);
        let content = fs::read(&full)
            .map_err(|e| Error::PackageFailure(format!("{}: {}", full.display(), e)))?;
        let mode = fs::metadata(&full)?.permissions().mode();
        append_data(&mut archive, &relative.to_string_lossy(), mode & 0o7777, mtime, &content)?;
    }

    debug!("Packaged {} entries from {}", entries.len(), destdir.display());

    let encoder = archive.into_inner()?;
    encoder.finish()?;

    staged.as_file().sync_all()?;
    staged
        .persist(output_path)
        .map_err(|e| Error::PackageFailure(format!("Failed to write {}: {}", output_path.display(), e.error)))?;

    Ok(manifest)
}

fn append_data<W: std::io::Write>(
    archive: &mut Builder<W>,
    path: &str,
    mode: u32,
    mtime: u64,
    content: &[u8],
) -> Result<()> {
    let mut header = header_for(EntryType::Regular, mode, content.len() as u64, mtime);
    archive.append_data(&mut header, path, content)?;
    Ok(())
}

fn header_for(entry_type: EntryType, mode: u32, size: u64, mtime: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mode(mode);
    header.set_size(size);
    header.set_mtime(mtime);
    header.set_uid(0);
    header.set_gid(0);
    header
}
