//! Shared helpers: a stand-in pandoc executable for process level tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for pandoc.
///
/// - Every invocation appends its arguments to `calls.log` next to the script
/// - `--output FILE` writes a fake zip header to FILE and prints nothing
/// - Otherwise echoes the input (trailing paths or stdin), turning `# ` and
///   `## ` lines into `<h1>`/`<h2>` elements
/// - `--verbose` writes a warning to stderr but still succeeds
/// - Any other unknown option fails like pandoc does
const STUB_SCRIPT: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
OUTPUT=""
FILES=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output|-o)
      OUTPUT="$2"; shift 2 ;;
    --from|-f|--to|-t|--write|-w|--read|-r|--variable|-V|--metadata|-M)
      shift 2 ;;
    --standalone|-s|--toc|--no-wrap|--smart|-S)
      shift ;;
    --verbose)
      echo "[WARNING] stub pandoc is chatty" >&2; shift ;;
    -*)
      echo "Unknown option $1." >&2; exit 1 ;;
    *)
      FILES="$FILES $1"; shift ;;
  esac
done
if [ -n "$FILES" ]; then
  INPUT=$(cat $FILES)
else
  INPUT=$(cat)
fi
if [ -n "$OUTPUT" ]; then
  printf 'PK\003\004stub' > "$OUTPUT"
  exit 0
fi
printf '%s\n' "$INPUT" | sed -e 's/^## \(.*\)$/<h2>\1<\/h2>/' -e 's/^# \(.*\)$/<h1>\1<\/h1>/'
"#;

pub struct StubPandoc {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl StubPandoc {
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn executable(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(unix)]
pub fn stub_pandoc() -> StubPandoc {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pandoc");
    fs::write(&path, STUB_SCRIPT).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    StubPandoc { dir, path }
}

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.display().to_string()
}

/// Value following `--output` in a logged argument line.
pub fn output_arg(call: &str) -> Option<String> {
    let mut words = call.split_whitespace();
    while let Some(word) = words.next() {
        if word == "--output" {
            return words.next().map(str::to_string);
        }
    }
    None
}
