//! Stand-in TeX engines for tests that should not depend on a TeX installation

use std::path::Path;
use std::sync::OnceLock;

use tempfile::TempDir;

use crate::config::Compiler;

/// Shell script mimicking the parts of a TeX engine the server relies on.
///
/// - sources containing `\undefinedcommand` fail with a TeX-style diagnostic
/// - sources containing `NOPDF` exit 0 without writing a PDF
/// - sources containing `SLEEP` hang for a while before finishing
/// - every `\input{name}` must resolve to `name` or `name.tex` in the cwd
/// - anything else produces `main.pdf` whose bytes depend only on the source
const FAKE_ENGINE: &str = r#"#!/bin/sh
engine=$(basename "$0")
if [ "$1" != "-interaction=nonstopmode" ]; then
    echo "$engine: unexpected flag '$1'"
    exit 2
fi
src="$2"
echo "This is fake $engine, reading $src"
if [ ! -f "$src" ]; then
    echo "! I can't find file \`$src'."
    exit 1
fi
if grep -q 'undefinedcommand' "$src"; then
    echo '! Undefined control sequence.'
    echo 'l.1 \undefinedcommand'
    exit 1
fi
if grep -q 'NOPDF' "$src"; then
    echo 'No pages of output.'
    exit 0
fi
if grep -q 'SLEEP' "$src"; then
    sleep 10
fi
for dep in $(sed -n 's/.*\\input{\([^}]*\)}.*/\1/p' "$src"); do
    if [ ! -f "$dep" ] && [ ! -f "$dep.tex" ]; then
        echo "! LaTeX Error: File \`$dep' not found."
        exit 1
    fi
done
{
    printf '%%PDF-1.5\n'
    printf '%% %s\n' "$engine"
    cat "$src"
    printf '\n%%%%EOF\n'
} > "${src%.*}.pdf"
echo "Output written on ${src%.*}.pdf."
"#;

/// Directory holding a fake engine under every supported compiler name
///
/// Created once per test process so scripts are never written while another
/// test is spawning them.
pub(crate) fn fake_bin_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir().expect("create fake bin dir");
        for compiler in Compiler::ALL {
            let path = dir.path().join(compiler.binary_name());
            std::fs::write(&path, FAKE_ENGINE).expect("write fake engine");
            make_executable(&path);
        }
        dir
    })
    .path()
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake engine");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
