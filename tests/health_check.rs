//! Integration tests for the health check system

use neural_runner::config::AppConfig;
use neural_runner::health::{self, CheckStatus, HealthCheckRunner, SystemCheck, checks::*};

#[test]
fn test_all_health_checks() {
    let report = health::run_all_checks();

    if !report.is_healthy() {
        eprintln!("\n{}", health::format_report(&report));
    }

    assert!(
        report.is_healthy(),
        "Health checks failed: {} failures, {} warnings",
        report.failed(),
        report.warned()
    );
    assert_eq!(report.total(), 5);
}

#[test]
fn test_config_check() {
    let result = ConfigCheck::new().check();
    assert!(result.status.is_ok(), "Config check failed: {}", result.message);
}

#[test]
fn test_runner_check() {
    let result = RunnerCheck::new().check();
    assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
}

#[test]
fn test_input_check() {
    let result = InputCheck::default().check();
    assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
}

#[test]
fn test_build_info_check() {
    let result = BuildInfoCheck::new().check();
    assert!(result.status.is_ok(), "Build info check failed: {}", result.message);
}

#[test]
fn test_checks_follow_loaded_config() {
    let mut config = AppConfig::default();
    config.assistant.api_key = Some("test-key".to_string());

    let report = health::run_checks_for(&config);
    assert_eq!(
        report.get("Assistant").map(|result| result.status),
        Some(CheckStatus::Pass)
    );
}

#[test]
fn test_runner_collects_all_checks() {
    let report = HealthCheckRunner::new()
        .add_check(ConfigCheck::new())
        .add_check(RunnerCheck::new())
        .run();

    assert_eq!(report.total(), 2);
    assert_eq!(report.passed() + report.warned() + report.failed(), report.total());
    assert!(report.results.iter().all(|outcome| outcome.result.details.is_some()));
}
