//! End-to-end runs of the phase controller against a scripted resolver.

use pybootstrap_cli::core::BootstrapError;
use pybootstrap_cli::models::PackageRequirement;
use pybootstrap_cli::resolver::{
    GuidanceGenerator, PhaseState, ProgressiveResolver, ResolutionOutcome, ResolutionPhase, Transition,
};
use pybootstrap_cli::test_utils::{ScriptedInvoker, fixtures, init_test_logging};

/// What the scripted resolver does at one phase.
#[derive(Debug, Clone, Copy)]
enum Step {
    Succeed,
    Conflict,
    OtherFailure,
}

fn script(steps: &[Step]) -> ScriptedInvoker {
    steps.iter().fold(ScriptedInvoker::new(), |invoker, step| match step {
        Step::Succeed => invoker.then_succeed(),
        Step::Conflict => invoker.then_fail(&fixtures::python_conflict("numpy", "2.3.1", "3.11")),
        Step::OtherFailure => invoker.then_fail(fixtures::network_error()),
    })
}

#[tokio::test]
async fn scenario_interpreter_too_old_succeeds_unconstrained() {
    init_test_logging(None);
    let invoker = ScriptedInvoker::new()
        .then_fail(&fixtures::python_conflict("numpy", "2.3.1", "3.11"))
        .then_fail(&fixtures::ranged_python_conflict("numpy", "2.3.1", "3.11"))
        .then_succeed();
    let resolver = ProgressiveResolver::new(invoker);
    let resolution = resolver.resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))]).await.unwrap();

    assert_eq!(
        resolver.invoker().calls(),
        vec![vec!["numpy==2.3.1"], vec!["numpy>=2.3.1"], vec!["numpy"]]
    );
    assert_eq!(
        resolution.outcome,
        ResolutionOutcome::Success {
            phase: ResolutionPhase::Unconstrained,
            requirements: vec!["numpy".to_string()],
        }
    );
    assert_eq!(resolution.log.warnings.len(), 1);
    assert!(resolution.log.warnings[0].contains("not reproducible"));

    // Every attempt is observable: phase, exact strings and the verdict
    let attempts = &resolution.log.attempts;
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[0].requirements, vec!["numpy==2.3.1"]);
    assert_eq!(attempts[0].verdict.as_ref().unwrap().offending_packages[0].name, "numpy");
    assert_eq!(attempts[1].requirements, vec!["numpy>=2.3.1"]);
    assert!(attempts[1].verdict.as_ref().unwrap().is_python_version_conflict);
    assert!(attempts[2].succeeded);
    assert!(attempts[2].verdict.is_none());
}

#[tokio::test]
async fn scenario_unknown_package_fails_without_retry() {
    let diagnostic = fixtures::package_not_found("totally-nonexistent-pkg-xyz");
    let resolver = ProgressiveResolver::new(ScriptedInvoker::new().then_fail(&diagnostic));
    let resolution = resolver
        .resolve(&[PackageRequirement::new("totally-nonexistent-pkg-xyz", None)])
        .await
        .unwrap();

    assert_eq!(
        resolution.outcome,
        ResolutionOutcome::NonRetryableFailure {
            phase: ResolutionPhase::Pinned,
            diagnostic,
        }
    );
    assert_eq!(resolver.invoker().calls(), vec![vec!["totally-nonexistent-pkg-xyz"]]);
}

#[tokio::test]
async fn unknown_package_under_split_header_fails_without_retry() {
    let diagnostic = fixtures::split_package_not_found("totally-nonexistent-pkg-xyz");
    let invoker = ScriptedInvoker::new().then_fail(&diagnostic).then_fail(&diagnostic).then_fail(&diagnostic);
    let resolver = ProgressiveResolver::new(invoker);
    let resolution = resolver
        .resolve(&[PackageRequirement::new("totally-nonexistent-pkg-xyz", None)])
        .await
        .unwrap();

    assert_eq!(
        resolution.outcome,
        ResolutionOutcome::NonRetryableFailure {
            phase: ResolutionPhase::Pinned,
            diagnostic,
        }
    );
    assert_eq!(resolver.invoker().call_count(), 1);
    assert_eq!(resolver.invoker().remaining(), 2);
    assert_eq!(resolution.log.final_state, PhaseState::Failed);
}

#[tokio::test]
async fn scenario_satisfiable_pins_succeed_first_time() {
    let resolver = ProgressiveResolver::new(ScriptedInvoker::new().then_succeed());
    let resolution = resolver
        .resolve(&[
            PackageRequirement::new("pandas", Some("2.0.0")),
            PackageRequirement::new("numpy", Some("1.24.0")),
        ])
        .await
        .unwrap();

    assert_eq!(
        resolution.outcome,
        ResolutionOutcome::Success {
            phase: ResolutionPhase::Pinned,
            requirements: vec!["pandas==2.0.0".to_string(), "numpy==1.24.0".to_string()],
        }
    );
    assert!(resolution.log.warnings.is_empty());
    assert_eq!(resolver.invoker().call_count(), 1);
}

#[tokio::test]
async fn scenario_unparseable_conflict_still_advances() {
    let invoker = ScriptedInvoker::new()
        .then_fail(fixtures::unparseable_python_conflict())
        .then_fail(fixtures::unparseable_python_conflict())
        .then_succeed();
    let resolver = ProgressiveResolver::new(invoker);
    let resolution = resolver.resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))]).await.unwrap();

    assert!(matches!(
        resolution.outcome,
        ResolutionOutcome::Success {
            phase: ResolutionPhase::Unconstrained,
            ..
        }
    ));
    for attempt in &resolution.log.attempts[..2] {
        let verdict = attempt.verdict.as_ref().unwrap();
        assert!(verdict.is_python_version_conflict);
        assert!(verdict.offending_packages.is_empty());
    }
}

#[tokio::test]
async fn phases_only_move_forward() {
    let steps = [Step::Succeed, Step::Conflict, Step::OtherFailure];
    for first in steps {
        for second in steps {
            for third in steps {
                let resolver = ProgressiveResolver::new(script(&[first, second, third]));
                let resolution = resolver.resolve(&[PackageRequirement::new("numpy", Some("2.3.1"))]).await.unwrap();

                let phases: Vec<ResolutionPhase> = resolution.log.phases().collect();
                assert!(!phases.is_empty());
                assert_eq!(phases[0], ResolutionPhase::Pinned);
                assert!(
                    phases.windows(2).all(|pair| pair[1] == pair[0].next().unwrap()),
                    "{first:?}/{second:?}/{third:?} visited {phases:?}"
                );

                // Every attempt but the last must have been a retryable conflict
                for attempt in &resolution.log.attempts[..phases.len() - 1] {
                    let verdict = attempt.verdict.as_ref().unwrap();
                    assert!(verdict.is_python_version_conflict);
                }

                let last = resolution.log.attempts.last().unwrap();
                let expected = Transition::from_attempt(
                    last.phase,
                    last.succeeded,
                    last.verdict.as_ref().is_some_and(|v| v.is_python_version_conflict),
                );
                assert_eq!(resolution.log.final_state, expected.next_state(last.phase));
                assert!(resolution.log.final_state.is_terminal());
            }
        }
    }
}

#[tokio::test]
async fn exhaustion_report_covers_every_phase() {
    let invoker = ScriptedInvoker::new()
        .then_fail(&fixtures::python_conflict("numpy", "2.3.1", "3.11"))
        .then_fail(fixtures::unparseable_python_conflict())
        .then_fail(&fixtures::python_conflict("scipy", "1.15.0", "3.10"));
    let resolver = ProgressiveResolver::new(invoker).with_guidance(GuidanceGenerator::new("uv", ["add"], "3.12"));
    let reqs = [
        PackageRequirement::new("numpy", Some("2.3.1")),
        PackageRequirement::new("scipy", Some("1.15.0")),
        PackageRequirement::new("rich", None),
    ];
    let resolution = resolver.resolve(&reqs).await.unwrap();

    let ResolutionOutcome::ExhaustedAllPhases {
        verdicts,
        guidance,
    } = &resolution.outcome
    else {
        panic!("expected exhaustion, got {:?}", resolution.outcome);
    };
    assert_eq!(verdicts.len(), 3);
    assert_eq!(resolution.log.final_state, PhaseState::Failed);

    // A package for each phase that extracted one
    assert!(guidance.contains("  - numpy"));
    assert!(guidance.contains("  - scipy"));
    // The phase without a package is quoted, not dropped
    assert!(guidance.contains("the current Python version is incompatible"));
    // Copy-pasteable remediation
    assert!(guidance.contains("uv python install 3.11 && uv python pin 3.11"));
    assert!(guidance.contains("requires-python = \">=3.11\""));
    assert!(guidance.contains("uv add 'numpy<2.3.1' 'scipy<1.15.0'"));
    assert!(guidance.contains("uv add rich"));
}

#[tokio::test]
async fn missing_resolver_is_a_distinct_error() {
    let invoker = ScriptedInvoker::new().then_error(BootstrapError::ResolverNotFound {
        program: "uv".to_string(),
    });
    let resolver = ProgressiveResolver::new(invoker);
    let err = resolver.resolve(&[PackageRequirement::new("numpy", None)]).await.unwrap_err();
    assert!(err.is_environment_fault());
}
