//! Runs a suite of checks and aggregates the results

use std::time::Instant;

use tracing::{debug, warn};

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Result of one check in a suite
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub name: String,
    pub description: Option<&'static str>,
    pub result: CheckResult,
}

/// Results from running a health check suite
#[derive(Debug, Default)]
pub struct HealthCheckReport {
    pub results: Vec<CheckOutcome>,
}

impl HealthCheckReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.results
            .iter()
            .filter(|outcome| outcome.result.status == status)
            .count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.count(CheckStatus::Pass)
    }

    pub fn warned(&self) -> usize {
        self.count(CheckStatus::Warn)
    }

    pub fn failed(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    /// No check failed
    pub fn is_healthy(&self) -> bool {
        self.failed() == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned() > 0
    }

    /// Process exit code: 0 = all pass, 1 = any fail, 2 = warnings only
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 {
            1
        } else if self.warned() > 0 {
            2
        } else {
            0
        }
    }

    /// Looks up a check's result by name
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|outcome| outcome.name == name)
            .map(|outcome| &outcome.result)
    }
}

/// Orchestrates running health checks and collecting results
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every check in registration order
    pub fn run(self) -> HealthCheckReport {
        let results = self
            .checks
            .into_iter()
            .map(|check| {
                let start = Instant::now();
                let result = check.check().with_duration(start.elapsed());

                if result.status.is_fail() {
                    warn!(check = check.name(), message = %result.message, "Health check failed");
                } else {
                    debug!(check = check.name(), status = %result.status, "Health check finished");
                }

                CheckOutcome {
                    name: check.name().to_string(),
                    description: check.description(),
                    result,
                }
            })
            .collect();

        HealthCheckReport { results }
    }
}
