//! Health checks for validating a build before playing
//!
//! Each subsystem gets a [`SystemCheck`] that exercises it without a terminal,
//! camera or network:
//! - Configuration profiles load and validate
//! - The runner simulation jumps, spawns and resets
//! - Input fusion turns hand frames and transcripts into actions
//! - The assistant has a usable endpoint, colors and (ideally) an API key
//!
//! # Example
//!
//! ```no_run
//! use neural_runner::health::{HealthCheckRunner, checks::*};
//!
//! let report = HealthCheckRunner::new()
//!     .add_check(ConfigCheck::new())
//!     .add_check(RunnerCheck::new())
//!     .add_check(BuildInfoCheck::new())
//!     .run();
//!
//! std::process::exit(report.exit_code());
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckLog, CheckResult, CheckStatus, SystemCheck};
pub use reporter::{format_report, print_report};
pub use runner::{CheckOutcome, HealthCheckReport, HealthCheckRunner};

use crate::config::AppConfig;

/// Runs all checks against the default configuration
pub fn run_all_checks() -> HealthCheckReport {
    run_checks_for(&AppConfig::default())
}

/// Runs all checks against a loaded configuration
pub fn run_checks_for(config: &AppConfig) -> HealthCheckReport {
    HealthCheckRunner::new()
        .add_check(checks::ConfigCheck::new())
        .add_check(checks::RunnerCheck::with_config(config.runner.clone()))
        .add_check(checks::InputCheck::new(config.input.jump_cooldown()))
        .add_check(checks::AssistantCheck::new(config.assistant.clone()))
        .add_check(checks::BuildInfoCheck::new())
        .run()
}
