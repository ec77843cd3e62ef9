//! Resolution logs appended to a JSON-lines action log.

use pybootstrap_cli::models::PackageRequirement;
use pybootstrap_cli::resolver::{PhaseState, ProgressiveResolver, ResolutionLog, ResolutionPhase};
use pybootstrap_cli::test_utils::{ScriptedInvoker, fixtures};
use tempfile::TempDir;

#[tokio::test]
async fn runs_are_appended_and_read_back_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".pybootstrap").join("actions.jsonl");

    let ranged = ProgressiveResolver::new(
        ScriptedInvoker::new()
            .then_fail(&fixtures::python_conflict("numpy", "2.3.1", "3.11"))
            .then_succeed(),
    )
    .resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))])
    .await
    .unwrap();
    let aborted = ProgressiveResolver::new(ScriptedInvoker::new().then_fail(fixtures::network_error()))
        .resolve(&[PackageRequirement::new("rich", None)])
        .await
        .unwrap();

    ranged.log.append_to(&path).await.unwrap();
    aborted.log.append_to(&path).await.unwrap();

    let runs = ResolutionLog::read_all(&path).await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0], ranged.log);
    assert_eq!(runs[1], aborted.log);
    assert_ne!(runs[0].run_id, runs[1].run_id);
    assert_eq!(runs[0].final_state, PhaseState::Succeeded(ResolutionPhase::Ranged));
    assert_eq!(runs[1].final_state, PhaseState::Failed);
}

#[tokio::test]
async fn log_lines_are_self_describing_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("actions.jsonl");

    let resolution = ProgressiveResolver::new(
        ScriptedInvoker::new()
            .then_fail(&fixtures::python_conflict("numpy", "2.3.1", "3.11"))
            .then_fail(&fixtures::ranged_python_conflict("numpy", "2.3.1", "3.11"))
            .then_succeed(),
    )
    .resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))])
    .await
    .unwrap();
    resolution.log.append_to(&path).await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let line = content.lines().next().unwrap();
    let value: serde_json::Value = serde_json::from_str(line).unwrap();

    assert_eq!(value["attempts"].as_array().unwrap().len(), 3);
    assert_eq!(value["attempts"][0]["phase"], "pinned");
    assert_eq!(value["attempts"][0]["requirements"][0], "numpy==2.3.1");
    assert_eq!(value["attempts"][0]["verdict"]["is_python_version_conflict"], true);
    assert_eq!(value["attempts"][0]["verdict"]["offending_packages"][0]["required_python"], ">=3.11");
    assert_eq!(value["attempts"][2]["phase"], "unconstrained");
    assert!(value["attempts"][2].get("verdict").is_none());
    assert_eq!(value["final_state"]["state"], "succeeded");
    assert_eq!(value["final_state"]["phase"], "unconstrained");
    assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
}
