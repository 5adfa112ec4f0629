// tests/cook.rs

//! Build, install and package workflow tests against stand-in compilers.

mod common;

use common::{files_under, kitchen, loggerd_source, mode_of, toolchain};
use flate2::read::GzDecoder;
use pkgcook::recipe::kitchen::{PackageManifest, MANIFEST_FILE};
use pkgcook::{Descriptor, Error, Kitchen, KitchenConfig};
use std::fs;
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn installed_binary(root: &Path) -> std::path::PathBuf {
    root.join("dest/usr/local/bin/loggerd")
}

#[test]
fn test_cook_installs_exactly_one_executable() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));
    let kitchen = kitchen(dir.path(), &toolchain().working);

    let result = kitchen.cook(&recipe).unwrap();

    let binary = installed_binary(dir.path());
    assert_eq!(result.installed, vec![binary.clone()]);
    assert_eq!(files_under(&dir.path().join("dest")), vec![binary.clone()]);
    assert_eq!(mode_of(&binary), 0o755);
    assert!(result.warnings.is_empty());
    assert!(result.build_dir.is_none());
}

#[test]
fn test_cook_passes_fixed_flags() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));
    let kitchen = kitchen(dir.path(), &toolchain().working);

    let result = kitchen.cook(&recipe).unwrap();

    let content = fs::read_to_string(installed_binary(dir.path())).unwrap();
    assert!(content.contains("built with: -O -inline -release loggerd.d"));
    assert!(result.log.contains("dmd -O -inline -release loggerd.d"));
}

#[test]
fn test_cook_leaves_source_tree_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let src = loggerd_source(dir.path());
    let recipe = Descriptor::loggerd(&src);

    kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap();

    // The artifact is produced in the build directory, not the source tree
    assert_eq!(files_under(&src), vec![src.join("loggerd.d")]);
}

#[test]
fn test_missing_source_file_fails_build_and_skips_install() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    let recipe = Descriptor::loggerd(&src);

    let err = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap_err();

    assert!(err.is_compile_failure());
    assert!(err.to_string().contains("module loggerd.d not found"));
    assert!(files_under(&dir.path().join("dest")).is_empty());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_source_tree() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(dir.path().join("does-not-exist"));

    let err = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap_err();

    assert!(matches!(err, Error::SourceNotFound(_)));
    assert!(!dir.path().join("dest").exists());
}

#[test]
fn test_missing_compiler_is_compile_failure() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let err = kitchen(dir.path(), &toolchain().empty).cook(&recipe).unwrap_err();

    match err {
        Error::CompileFailure { command, status, .. } => {
            assert_eq!(command, "dmd -O -inline -release loggerd.d");
            assert_eq!(status, "not found");
        }
        other => panic!("expected compile failure, got {other}"),
    }
    assert!(!dir.path().join("dest").exists());
}

#[test]
fn test_compiler_diagnostics_are_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let err = kitchen(dir.path(), &toolchain().broken).cook(&recipe).unwrap_err();

    match &err {
        Error::CompileFailure { stderr, .. } => {
            assert_eq!(stderr, "loggerd.d(3): Error: undefined identifier `oops`\n");
        }
        other => panic!("expected compile failure, got {other}"),
    }
    assert!(err.to_string().contains("undefined identifier `oops`"));
    assert!(!dir.path().join("dest").exists());
}

#[test]
fn test_compiler_diagnostics_on_stdout_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let err = kitchen(dir.path(), &toolchain().chatty).cook(&recipe).unwrap_err();

    match &err {
        Error::CompileFailure { stdout, .. } => {
            assert_eq!(stdout, "loggerd.d(1): Error: boom\n");
        }
        other => panic!("expected compile failure, got {other}"),
    }
    assert!(err.to_string().contains("loggerd.d(1): Error: boom"));
    assert!(!dir.path().join("dest").exists());
}

#[test]
fn test_compiler_without_artifact_fails() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let err = kitchen(dir.path(), &toolchain().silent).cook(&recipe).unwrap_err();

    assert!(err.is_compile_failure());
    assert!(err.to_string().contains("was not produced"));
    assert!(!dir.path().join("dest").exists());
}

#[test]
fn test_blocked_destination_fails_install_without_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    // A regular file where the bin directory should be
    let local = dir.path().join("dest/usr/local");
    fs::create_dir_all(&local).unwrap();
    fs::write(local.join("bin"), b"not a directory").unwrap();

    let err = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap_err();

    assert!(err.is_install_failure());
    assert_eq!(files_under(&dir.path().join("dest")), vec![local.join("bin")]);
    assert_eq!(fs::read(local.join("bin")).unwrap(), b"not a directory");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_unreplaceable_destination_fails_install_without_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    // A non-empty directory at the target path; the final rename cannot replace it
    let bin = dir.path().join("dest/usr/local/bin");
    let occupied = bin.join("loggerd");
    fs::create_dir_all(&occupied).unwrap();
    fs::write(occupied.join("keep"), b"occupied").unwrap();

    let err = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap_err();

    assert!(err.is_install_failure());
    let names: Vec<_> = fs::read_dir(&bin)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["loggerd"]);
    assert_eq!(files_under(&occupied), vec![occupied.join("keep")]);
    assert_eq!(fs::read(occupied.join("keep")).unwrap(), b"occupied");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_read_only_destination_fails_install_without_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let bin = dir.path().join("dest/usr/local/bin");
    fs::create_dir_all(&bin).unwrap();
    fs::set_permissions(&bin, fs::Permissions::from_mode(0o555)).unwrap();

    // Permission bits do not stop root
    let marker = bin.join(".write-test");
    if fs::write(&marker, b"").is_ok() {
        fs::remove_file(&marker).unwrap();
        eprintln!("Skipping read-only destination test: running with elevated privileges");
        return;
    }

    let err = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap_err();

    assert!(err.is_install_failure());
    assert_eq!(fs::read_dir(&bin).unwrap().count(), 0);

    fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));
    let kitchen = kitchen(dir.path(), &toolchain().working);

    let first = kitchen.cook(&recipe).unwrap();
    let first_binary = fs::read(installed_binary(dir.path())).unwrap();
    let first_package = fs::read(first.package_path.as_ref().unwrap()).unwrap();

    let second = kitchen.cook(&recipe).unwrap();
    assert_eq!(first.package_path, second.package_path);
    assert_eq!(fs::read(installed_binary(dir.path())).unwrap(), first_binary);
    assert_eq!(fs::read(second.package_path.as_ref().unwrap()).unwrap(), first_package);
    assert_eq!(
        files_under(&dir.path().join("dest")),
        vec![installed_binary(dir.path())]
    );
    assert_eq!(files_under(&dir.path().join("out")).len(), 1);
}

#[test]
fn test_package_leaves_out_stale_staged_files() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let bin = dir.path().join("dest/usr/local/bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("oldtool"), b"from an earlier run").unwrap();

    let result = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap();
    assert_eq!(result.installed, vec![installed_binary(dir.path())]);

    let package = result.package_path.unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(fs::File::open(&package).unwrap()));
    let mut manifest = None;
    let mut paths = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry
            .path()
            .unwrap()
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string();
        if path == MANIFEST_FILE {
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            manifest = Some(PackageManifest::from_toml(&content).unwrap());
        }
        paths.push(path);
    }

    assert_eq!(
        paths,
        vec![
            MANIFEST_FILE,
            "usr",
            "usr/local",
            "usr/local/bin",
            "usr/local/bin/loggerd",
        ]
    );
    let manifest = manifest.expect("package has a manifest");
    let files: Vec<_> = manifest.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(files, vec!["/usr/local/bin/loggerd"]);

    // The staging root itself is left alone
    assert_eq!(fs::read(bin.join("oldtool")).unwrap(), b"from an earlier run");
}

#[test]
fn test_package_contents() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));

    let result = kitchen(dir.path(), &toolchain().working).cook(&recipe).unwrap();

    let package = result.package_path.unwrap();
    assert_eq!(package, dir.path().join("out/loggerd-1.0.0-1.tar.gz"));

    let mut archive = tar::Archive::new(GzDecoder::new(fs::File::open(&package).unwrap()));
    let mut manifest = None;
    let mut paths = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry.path().unwrap().to_string_lossy().into_owned();
        if path == MANIFEST_FILE {
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            manifest = Some(PackageManifest::from_toml(&content).unwrap());
        }
        paths.push(path);
    }

    assert!(paths.contains(&"usr/local/bin/loggerd".to_string()));

    let manifest = manifest.expect("package has a manifest");
    assert_eq!(manifest.package.name, "loggerd");
    assert_eq!(manifest.package.version, "1.0.0");
    assert_eq!(manifest.package.revision, "1");
    assert_eq!(
        manifest.package.homepage.as_deref(),
        Some("https://github.com/codekitchen/loggerd")
    );
    assert_eq!(manifest.files.len(), 1);
    assert_eq!(manifest.files[0].path, "/usr/local/bin/loggerd");
    assert_eq!(manifest.files[0].mode, 0o755);
    assert_eq!(
        manifest.files[0].sha256,
        pkgcook::hash::sha256_file(&installed_binary(dir.path())).unwrap()
    );
}

#[test]
fn test_cook_without_package() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));
    let kitchen = Kitchen::new(
        KitchenConfig::new(dir.path().join("dest"), dir.path().join("out"))
            .with_search_path(&toolchain().working)
            .without_package(),
    );

    let result = kitchen.cook(&recipe).unwrap();

    assert!(result.package_path.is_none());
    assert!(installed_binary(dir.path()).is_file());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_split_build_then_install() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Descriptor::loggerd(loggerd_source(dir.path()));
    let mut config = KitchenConfig::new(dir.path().join("dest"), dir.path().join("out"))
        .with_search_path(&toolchain().working)
        .without_package();
    config.build_root = Some(dir.path().join("build"));
    let kitchen = Kitchen::new(config);

    let build_dir = kitchen.build(&recipe).unwrap();
    assert!(build_dir.starts_with(dir.path().join("build")));
    assert!(build_dir.join("source/loggerd").is_file());
    assert!(!dir.path().join("dest").exists());

    let result = kitchen.install(&recipe, &build_dir).unwrap();
    assert_eq!(result.installed, vec![installed_binary(dir.path())]);
    assert_eq!(mode_of(&installed_binary(dir.path())), 0o755);
}
