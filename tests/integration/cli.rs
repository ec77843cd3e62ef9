//! The `pybootstrap` binary against fake resolver scripts.

use assert_cmd::Command;
use predicates::prelude::*;
use pybootstrap_cli::resolver::ResolutionLog;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fails with a Python-version conflict whenever any argument carries a
/// version constraint, reports unknown packages, and succeeds otherwise.
const PICKY_RESOLVER: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    totally-nonexistent*)
      echo "  x No solution found when resolving dependencies:" >&2
      echo "  Because $arg was not found in the package registry and your project depends on $arg, we can conclude that your project's requirements are unsatisfiable." >&2
      exit 1
      ;;
    *==*|*'>='*)
      echo "  x No solution found when resolving dependencies:" >&2
      echo "  Because numpy==2.3.1 depends on Python>=3.11 and the requested Python version (>=3.9) does not satisfy Python>=3.11, we can conclude that your project's requirements are unsatisfiable." >&2
      exit 1
      ;;
  esac
done
echo "Resolved $# arguments"
"#;

/// Always fails with a Python-version conflict.
const HOPELESS_RESOLVER: &str = r#"#!/bin/sh
echo "  x No solution found when resolving dependencies:" >&2
echo "  Because all versions of numpy depend on Python>=3.11, we can conclude that your project's requirements are unsatisfiable." >&2
exit 1
"#;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new(script: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let resolver = dir.path().join("fake-uv");
        std::fs::write(&resolver, script).unwrap();
        std::fs::set_permissions(&resolver, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!("[resolver]\nprogram = \"{}\"\nargs = [\"add\"]\n", resolver.display()),
        )
        .unwrap();
        Self {
            dir,
            config,
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pybootstrap").unwrap();
        cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").arg("--config").arg(&self.config);
        cmd
    }
}

#[test]
fn resolve_falls_back_to_unconstrained_with_warning() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    let log = fixture.path().join("logs").join("actions.jsonl");

    fixture
        .cmd()
        .args(["resolve", "numpy==2.3.1", "rich", "--action-log"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("at the unconstrained phase"))
        .stdout(predicate::str::contains("  numpy\n"))
        .stdout(predicate::str::contains("not reproducible"));

    let runs = tokio::runtime::Runtime::new().unwrap().block_on(ResolutionLog::read_all(&log)).unwrap();
    assert_eq!(runs.len(), 1);
    let requirements: Vec<&Vec<String>> = runs[0].attempts.iter().map(|a| &a.requirements).collect();
    assert_eq!(
        requirements,
        vec![
            &vec!["numpy==2.3.1".to_string(), "rich".to_string()],
            &vec!["numpy>=2.3.1".to_string(), "rich".to_string()],
            &vec!["numpy".to_string(), "rich".to_string()],
        ]
    );
}

#[test]
fn resolve_unversioned_succeeds_pinned() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    fixture
        .cmd()
        .args(["resolve", "rich", "pandas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 2 package(s) at the pinned phase"))
        .stdout(predicate::str::contains("Warning").not());
}

#[test]
fn resolve_unknown_package_shows_raw_diagnostic() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    fixture
        .cmd()
        .args(["resolve", "totally-nonexistent-pkg-xyz"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("pinned phase"))
        .stderr(predicate::str::contains("was not found in the package registry"));
}

#[test]
fn resolve_exhausted_prints_guidance() {
    let fixture = Fixture::new(HOPELESS_RESOLVER);
    fixture
        .cmd()
        .args(["resolve", "numpy==2.3.1", "rich"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Remediation options"))
        .stdout(predicate::str::contains("python install 3.11"))
        .stdout(predicate::str::contains("--resolution lowest-direct numpy"))
        .stderr(predicate::str::contains("Cannot resolve dependencies"));
}

#[test]
fn resolve_reads_requirements_file_and_prints_json() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    let requirements = fixture.path().join("requirements.txt");
    std::fs::write(&requirements, "# generated\nrich\n\nclick\n").unwrap();

    let output = fixture
        .cmd()
        .args(["resolve", "-r"])
        .arg(&requirements)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["outcome"]["outcome"], "success");
    assert_eq!(value["outcome"]["phase"], "pinned");
    assert_eq!(value["outcome"]["requirements"], serde_json::json!(["rich", "click"]));
}

#[test]
fn resolve_with_missing_program_suggests_install() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    fixture
        .cmd()
        .args(["resolve", "rich", "--program", "pybootstrap-definitely-missing-resolver"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed or not found in PATH"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn classify_reads_stdin() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    fixture
        .cmd()
        .arg("classify")
        .write_stdin("No solution found: numpy==2.3.1 depends on Python>=3.11\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Python-version conflict"))
        .stdout(predicate::str::contains("numpy==2.3.1 requires Python>=3.11"));
}

#[test]
fn config_path_and_show_use_override() {
    let fixture = Fixture::new(PICKY_RESOLVER);
    fixture
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    fixture
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fake-uv"));
}
