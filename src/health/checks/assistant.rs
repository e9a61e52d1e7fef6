//! Assistant health check

use crate::assistant::{AccentColor, Intent, classify};
use crate::config::AssistantConfig;
use crate::health::check::{CheckLog, CheckResult, SystemCheck};

/// Validates assistant settings; warns when no API key is available
pub struct AssistantCheck {
    config: AssistantConfig,
}

impl AssistantCheck {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }
}

impl Default for AssistantCheck {
    fn default() -> Self {
        Self::new(AssistantConfig::default())
    }
}

impl SystemCheck for AssistantCheck {
    fn name(&self) -> &'static str {
        "Assistant"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Text generation settings, colors and command routing")
    }

    fn check(&self) -> CheckResult {
        let mut log = CheckLog::new();

        match reqwest::Url::parse(&self.config.endpoint) {
            Ok(url) => log.ok(format!("Endpoint {url} (model {})", self.config.model)),
            Err(e) => log.fail(format!("Endpoint '{}' is invalid: {e}", self.config.endpoint)),
        }

        match AccentColor::parse(&self.config.default_color) {
            Some(color) => log.ok(format!("Default accent {color}")),
            None => log.fail(format!(
                "Default accent '{}' is not a hex color",
                self.config.default_color
            )),
        }

        let broken: Vec<_> = AccentColor::PRESETS
            .iter()
            .filter(|(_, hex)| AccentColor::parse(hex).is_none())
            .map(|(name, _)| *name)
            .collect();
        log.record(
            broken.is_empty(),
            format!("{} color presets valid {broken:?}", AccentColor::PRESETS.len()),
        );

        log.record(
            classify("change the color scheme") == Intent::ChangeColor
                && classify("restart") == Intent::ResetGame
                && classify("hello") == Intent::General,
            "Commands classified by keyword",
        );

        if self.config.resolve_api_key().is_some() {
            log.ok("API key configured");
        } else {
            log.warn(format!(
                "No API key ({} is not set), replies use fallbacks",
                self.config.api_key_env
            ));
        }

        log.finish(format!("Ready ({})", self.config.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CheckStatus;

    #[test]
    fn test_missing_key_warns() {
        let check = AssistantCheck::new(AssistantConfig {
            api_key: None,
            api_key_env: "JARVIS_HEALTH_KEY_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        });
        assert_eq!(check.check().status, CheckStatus::Warn);
    }

    #[test]
    fn test_configured_key_passes() {
        let check = AssistantCheck::new(AssistantConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        });
        assert_eq!(check.check().status, CheckStatus::Pass);
    }

    #[test]
    fn test_bad_color_fails() {
        let check = AssistantCheck::new(AssistantConfig {
            api_key: Some("secret".to_string()),
            default_color: "cyan".to_string(),
            ..Default::default()
        });
        assert!(check.check().status.is_fail());
    }
}
