// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use pkgcook::{Kitchen, KitchenConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Stand-in compilers, each in its own directory so a test picks one by search path.
pub struct Toolchain {
    _root: TempDir,
    /// `dmd` that writes a small script named after the first source file
    pub working: PathBuf,
    /// `dmd` that prints a diagnostic and exits 1
    pub broken: PathBuf,
    /// `dmd` that prints its diagnostic on stdout and exits 1
    pub chatty: PathBuf,
    /// `dmd` that exits 0 without writing anything
    pub silent: PathBuf,
    /// No `dmd` at all
    pub empty: PathBuf,
}

const WORKING_DMD: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
    case "$arg" in
        -*) ;;
        *.d)
            if [ ! -f "$arg" ]; then
                echo "Error: module $arg not found" >&2
                exit 1
            fi
            [ -z "$out" ] && out="${arg%.d}"
            ;;
    esac
done
if [ -z "$out" ]; then
    echo "Error: no source files" >&2
    exit 1
fi
printf '#!/bin/sh\necho "built with: %s"\n' "$*" > "$out"
"#;

const BROKEN_DMD: &str = r#"#!/bin/sh
echo 'loggerd.d(3): Error: undefined identifier `oops`' >&2
exit 1
"#;

const CHATTY_DMD: &str = "#!/bin/sh\necho 'loggerd.d(1): Error: boom'\nexit 1\n";

const SILENT_DMD: &str = "#!/bin/sh\nexit 0\n";

/// Fake toolchains, written once per test binary.
///
/// Written before any test spawns them so no script is still open for
/// writing when another thread forks.
pub fn toolchain() -> &'static Toolchain {
    static TOOLCHAIN: OnceLock<Toolchain> = OnceLock::new();
    TOOLCHAIN.get_or_init(|| {
        let root = tempfile::tempdir().unwrap();
        let working = write_tool(root.path(), "working", WORKING_DMD);
        let broken = write_tool(root.path(), "broken", BROKEN_DMD);
        let chatty = write_tool(root.path(), "chatty", CHATTY_DMD);
        let silent = write_tool(root.path(), "silent", SILENT_DMD);
        let empty = root.path().join("empty");
        fs::create_dir_all(&empty).unwrap();

        Toolchain {
            _root: root,
            working,
            broken,
            chatty,
            silent,
            empty,
        }
    })
}

fn write_tool(root: &Path, dir: &str, script: &str) -> PathBuf {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    let tool = dir.join("dmd");
    fs::write(&tool, script).unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
    dir
}

/// Create `<root>/src/loggerd.d` and return the source directory.
pub fn loggerd_source(root: &Path) -> PathBuf {
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("loggerd.d"),
        "import std.stdio;\nvoid main() { writeln(\"loggerd\"); }\n",
    )
    .unwrap();
    src
}

/// Kitchen staging under `<root>/dest`, packaging into `<root>/out`.
pub fn kitchen(root: &Path, search_path: &Path) -> Kitchen {
    Kitchen::new(
        KitchenConfig::new(root.join("dest"), root.join("out")).with_search_path(search_path),
    )
}

/// All non-directory entries under `root`, sorted.
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| !e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Permission bits of a file.
pub fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}
