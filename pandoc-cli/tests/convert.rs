#[cfg(unix)]
mod unix {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn write_stub_pandoc() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let script_path = dir.path().join("pandoc");
        let script = r#"#!/bin/sh
OUTPUT=""
FILES=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output|-o) OUTPUT="$2"; shift 2 ;;
    --from|--to) shift 2 ;;
    --standalone) shift ;;
    -*) echo "Unknown option $1." >&2; exit 1 ;;
    *) FILES="$FILES $1"; shift ;;
  esac
done
if [ -n "$FILES" ]; then INPUT=$(cat $FILES); else INPUT=$(cat); fi
if [ -n "$OUTPUT" ]; then
  printf 'PK\003\004stub' > "$OUTPUT"
  exit 0
fi
printf '%s\n' "$INPUT" | sed -e 's/^# \(.*\)$/<h1>\1<\/h1>/'
"#;
        fs::write(&script_path, script).unwrap();
        let mut perms = fs::metadata(&script_path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script_path, perms).unwrap();
        (dir, script_path)
    }

    #[test]
    fn converts_literal_text() {
        let (dir, stub) = write_stub_pandoc();
        let mut cmd = cargo_bin_cmd!("panbabel");
        cmd.current_dir(dir.path())
            .arg("# hello")
            .arg("--to")
            .arg("html")
            .arg("--pandoc")
            .arg(&stub);

        cmd.assert().success().stdout("<h1>hello</h1>\n");
    }

    #[test]
    fn reads_standard_input_for_dash() {
        let (dir, stub) = write_stub_pandoc();
        let mut cmd = cargo_bin_cmd!("panbabel");
        cmd.current_dir(dir.path())
            .arg("-")
            .arg("--pandoc")
            .arg(&stub)
            .write_stdin("# piped\n");

        cmd.assert().success().stdout("<h1>piped</h1>\n");
    }

    #[test]
    fn pandoc_failure_is_reported() {
        let (dir, stub) = write_stub_pandoc();
        let mut cmd = cargo_bin_cmd!("panbabel");
        cmd.current_dir(dir.path())
            .arg("# hello")
            .arg("--extra-badopt")
            .arg("--pandoc")
            .arg(&stub);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Unknown option --badopt."))
            .stderr(predicate::str::contains("exit code 1"));
    }

    #[test]
    fn binary_writer_requires_output_path() {
        let (dir, stub) = write_stub_pandoc();
        let mut cmd = cargo_bin_cmd!("panbabel");
        cmd.current_dir(dir.path())
            .arg("# report")
            .arg("--to")
            .arg("docx")
            .arg("--pandoc")
            .arg(&stub);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("-o <path>"));
    }

    #[test]
    fn binary_writer_writes_output_file() {
        let (dir, stub) = write_stub_pandoc();
        let output = dir.path().join("report.docx");
        let mut cmd = cargo_bin_cmd!("panbabel");
        cmd.current_dir(dir.path())
            .arg("# report")
            .arg("--to")
            .arg("docx")
            .arg("-o")
            .arg(&output)
            .arg("--pandoc")
            .arg(&stub);

        cmd.assert().success().stdout("");
        assert_eq!(fs::read(&output).unwrap(), b"PK\x03\x04stub");
    }

    #[test]
    fn path_mode_converts_files() {
        let (dir, stub) = write_stub_pandoc();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# From file\n").unwrap();

        let mut cmd = cargo_bin_cmd!("panbabel");
        cmd.current_dir(dir.path())
            .arg("--path-mode")
            .arg(&input)
            .arg("--to")
            .arg("html")
            .arg("--pandoc")
            .arg(&stub);

        cmd.assert().success().stdout("<h1>From file</h1>\n");
    }
}

#[cfg(not(unix))]
#[test]
fn convert_cli_tests_skipped() {
    eprintln!("Skipping convert CLI tests on non-Unix platforms");
}
