use pybootstrap_cli::invoker::ResolverInvocationResult;
use pybootstrap_cli::test_utils::fixtures;
use pybootstrap_cli::version::{classify, classify_diagnostic};

/// Fragments that are combined into many malformed diagnostics.
const FRAGMENTS: &[&str] = &[
    "",
    "No solution found",
    "python",
    "Python>=",
    "depends on",
    "==",
    "all versions of",
    "[",
    "]",
    "\u{0}",
    "→ ╰─▶ ×",
    "解決策が見つかりません",
    "numpy==",
    "3.11.",
    "\n\n",
    "requires-python",
    ")",
];

#[test]
fn classification_never_panics_on_arbitrary_text() {
    for a in FRAGMENTS {
        for b in FRAGMENTS {
            for c in FRAGMENTS {
                let text = format!("{a}{b} {c}");
                let verdict = classify_diagnostic(&text);
                assert_eq!(verdict.diagnostic, text);
                if !verdict.is_python_version_conflict {
                    assert!(verdict.offending_packages.is_empty());
                }
            }
        }
    }
}

#[test]
fn huge_input_is_classified() {
    let text = fixtures::python_conflict("numpy", "2.3.1", "3.11").repeat(500);
    let verdict = classify_diagnostic(&text);
    assert!(verdict.is_python_version_conflict);
    assert_eq!(verdict.offending_packages.len(), 1);
}

#[test]
fn conflict_without_recognizable_package_keeps_flag() {
    let verdict = classify_diagnostic(fixtures::unparseable_python_conflict());
    assert!(verdict.is_python_version_conflict);
    assert!(verdict.offending_packages.is_empty());
}

#[test]
fn both_phrases_are_required() {
    assert!(!classify_diagnostic("No solution found when resolving dependencies").is_python_version_conflict);
    assert!(!classify_diagnostic("requires-python = \">=3.9\"").is_python_version_conflict);
    assert!(!classify_diagnostic(&fixtures::package_not_found("totally-nonexistent-pkg-xyz")).is_python_version_conflict);
    assert!(!classify_diagnostic(fixtures::network_error()).is_python_version_conflict);
}

#[test]
fn classify_reads_stdout_when_stderr_is_empty() {
    let result = ResolverInvocationResult {
        succeeded: false,
        exit_code: 1,
        stdout: fixtures::python_conflict("pandas", "2.2.3", "3.10"),
        stderr: String::new(),
    };
    let verdict = classify(&result);
    assert!(verdict.is_python_version_conflict);
    assert_eq!(verdict.offending_packages[0].name, "pandas");
    assert_eq!(verdict.offending_packages[0].required_python, ">=3.10");
}
