//! Health check trait and result types

use std::fmt;
use std::time::Duration;

use colored::Colorize;

/// Outcome class of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Usable, but degraded (e.g. assistant without an API key)
    Warn,
    Fail,
}

impl CheckStatus {
    /// Pass or Warn
    pub fn is_ok(self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(self) -> bool {
        self == CheckStatus::Fail
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
        }
    }

    /// Label colored for terminal output
    pub fn as_colored_str(self) -> String {
        match self {
            CheckStatus::Pass => self.label().green().to_string(),
            CheckStatus::Warn => self.label().yellow().to_string(),
            CheckStatus::Fail => self.label().red().to_string(),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a system check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// One-line summary shown in the report table
    pub message: String,
    /// Multi-line findings printed below the table
    pub details: Option<String>,
    /// Filled in by the runner
    pub duration: Duration,
}

impl CheckResult {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Collects detail lines and the first failure while a check runs
#[derive(Debug, Default)]
pub struct CheckLog {
    lines: Vec<String>,
    failure: Option<String>,
    warning: Option<String>,
}

impl CheckLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&mut self, line: impl AsRef<str>) {
        self.lines.push(format!("  ✓ {}", line.as_ref()));
    }

    /// Records a degraded finding; the first one becomes the warning message
    pub fn warn(&mut self, line: impl AsRef<str>) {
        self.lines.push(format!("  ⚠ {}", line.as_ref()));
        self.warning.get_or_insert_with(|| line.as_ref().to_string());
    }

    /// Records a failure; the first one becomes the failure message
    pub fn fail(&mut self, line: impl AsRef<str>) {
        self.lines.push(format!("  ✗ {}", line.as_ref()));
        self.failure.get_or_insert_with(|| line.as_ref().to_string());
    }

    /// Records `line` as ok or failed depending on `passed`
    pub fn record(&mut self, passed: bool, line: impl AsRef<str>) -> bool {
        if passed {
            self.ok(line);
        } else {
            self.fail(line);
        }
        passed
    }

    /// Builds the result, using `summary` when nothing went wrong
    pub fn finish(self, summary: impl Into<String>) -> CheckResult {
        let details = self.lines.join("\n");
        let result = match (self.failure, self.warning) {
            (Some(failure), _) => CheckResult::fail(failure),
            (None, Some(warning)) => CheckResult::warn(warning),
            (None, None) => CheckResult::pass(summary),
        };
        result.with_details(details)
    }
}

/// A subsystem that can verify itself
pub trait SystemCheck {
    /// Name shown in the report
    fn name(&self) -> &'static str;

    fn check(&self) -> CheckResult;

    /// What this check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
