//! Boot verifier properties, driven through the simulated checks

use xtl::verify::{
    steps_for, BootCheckResult, BootVerifier, FailAt, StepId, StopCode, VerifyOptions,
};

fn simulated(fail_at: Option<FailAt>) -> VerifyOptions {
    std::env::set_var("XTL_LITE_MODE", "1");
    VerifyOptions {
        title: None,
        simulate: true,
        simulate_fail_at: fail_at,
    }
}

#[tokio::test]
async fn arch_full_pass_runs_five_steps() {
    assert_eq!(steps_for("archlinux").len(), 5);
    let result = BootVerifier::default()
        .verify("archlinux", simulated(None))
        .await;
    assert_eq!(result, BootCheckResult::Ok);
}

#[tokio::test]
async fn ubuntu_sequence_has_no_package_manager_step() {
    assert_eq!(steps_for("ubuntu").len(), 4);
    let result = BootVerifier::default()
        .verify("ubuntu", simulated(None))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn integrity_failure_reports_corrupted_distro() {
    let result = BootVerifier::default()
        .verify(
            "archlinux",
            simulated(Some(FailAt::Id(StepId::Integrity))),
        )
        .await;
    assert_eq!(
        result,
        BootCheckResult::Fail(StopCode::DistroCorrupted("archlinux".to_string()))
    );
    assert_eq!(
        result.stop_code().unwrap().to_string(),
        "DISTRO_CORRUPTED:archlinux"
    );
}

#[tokio::test]
async fn host_failure_reports_missing_dependency() {
    let result = BootVerifier::default()
        .verify("ubuntu", simulated(Some(FailAt::Id(StepId::Host))))
        .await;
    assert_eq!(
        result,
        BootCheckResult::Fail(StopCode::HostDependencyMissing)
    );
}

#[tokio::test]
async fn failure_can_be_addressed_by_index() {
    let result = BootVerifier::default()
        .verify("ubuntu", simulated(Some(FailAt::Index(3))))
        .await;
    assert_eq!(
        result,
        BootCheckResult::Fail(StopCode::SystemFilesMissing("ubuntu".to_string()))
    );
}

#[tokio::test]
async fn pkg_step_failure_applies_only_to_arch() {
    // ubuntu has no pkg step, so the forced failure resolves to nothing.
    let result = BootVerifier::default()
        .verify("ubuntu", simulated(Some(FailAt::Id(StepId::Pkg))))
        .await;
    assert!(result.is_ok());

    let result = BootVerifier::default()
        .verify("archlinux", simulated(Some(FailAt::Id(StepId::Pkg))))
        .await;
    assert_eq!(
        result,
        BootCheckResult::Fail(StopCode::PackageManagerMissing("archlinux".to_string()))
    );
}

#[tokio::test]
async fn blank_alias_is_normalized() {
    let result = BootVerifier::default()
        .verify("   ", simulated(Some(FailAt::Id(StepId::System))))
        .await;
    assert_eq!(
        result.stop_code().unwrap().to_string(),
        "SYSTEM_FILES_MISSING:unknown"
    );
}

#[tokio::test]
async fn every_step_maps_to_its_fixed_stop_code() {
    let expectations = [
        (StepId::Host, "HOST_DEPENDENCY_MISSING"),
        (StepId::Installed, "DISTRO_NOT_INSTALLED"),
        (StepId::Integrity, "DISTRO_CORRUPTED:archlinux"),
        (StepId::System, "SYSTEM_FILES_MISSING:archlinux"),
        (StepId::Pkg, "PACKAGE_MANAGER_MISSING:archlinux"),
    ];
    for (id, expected) in expectations {
        let result = BootVerifier::default()
            .verify("archlinux", simulated(Some(FailAt::Id(id))))
            .await;
        assert_eq!(result.stop_code().unwrap().to_string(), expected);
    }
}
