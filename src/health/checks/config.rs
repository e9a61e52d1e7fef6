//! Configuration system health check

use crate::config::AppConfig;
use crate::health::check::{CheckLog, CheckResult, SystemCheck};

/// Checks that configuration can be loaded and validated for each profile
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    /// Creates a config check for the debug and release profiles
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    /// Creates a config check with custom profiles
    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates configuration loading from files and environment")
    }

    fn check(&self) -> CheckResult {
        let mut log = CheckLog::new();

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => log.ok(format!(
                    "Profile '{profile}': {} fps, gravity {}, jump {}, accent {}",
                    config.frame.fps,
                    config.runner.gravity,
                    config.runner.jump_force,
                    config.default_color()
                )),
                Err(e) => log.fail(format!("Profile '{profile}' failed to load: {e}")),
            }
        }

        match AppConfig::load_from_env() {
            Ok(config) => log.ok(format!("Environment selects profile '{}'", config.profile)),
            Err(e) => log.warn(format!("Environment config: {e}")),
        }

        let defaults = AppConfig::default();
        log.record(
            defaults.validate().is_ok(),
            "Built-in defaults pass validation",
        );

        log.finish(format!("{} profiles validated", self.profiles.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_profile_falls_back_to_defaults() {
        // Profile files are optional; a missing one still yields a valid config
        let result = ConfigCheck::with_profiles(vec!["no-such-profile"]).check();
        assert!(result.status.is_ok(), "{}", result.message);
    }
}
