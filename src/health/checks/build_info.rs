//! Build information health check

use crate::build_info;
use crate::health::check::{CheckLog, CheckResult, SystemCheck};

/// Reports build metadata; warns when the binary was built outside git
#[derive(Debug, Default)]
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Build metadata (git, rustc, target)")
    }

    fn check(&self) -> CheckResult {
        let mut log = CheckLog::new();

        let sha = build_info::git_sha_short();
        if sha == "unknown" {
            log.warn("Git metadata unavailable");
        } else {
            log.ok(format!(
                "Git: {}@{sha}{}",
                build_info::GIT_BRANCH.unwrap_or("detached"),
                if build_info::is_git_dirty() { " (dirty)" } else { "" }
            ));
        }
        log.ok(format!("Built: {}", build_info::BUILD_TIMESTAMP));
        log.ok(format!(
            "Rustc: {} ({})",
            build_info::RUSTC_SEMVER,
            build_info::RUSTC_CHANNEL
        ));
        log.ok(format!(
            "Target: {} (opt-level {})",
            build_info::CARGO_TARGET_TRIPLE,
            build_info::CARGO_OPT_LEVEL
        ));

        log.finish(build_info::version_string())
    }
}
