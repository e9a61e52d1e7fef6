//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::assistant::AccentColor;
use crate::sim::RunnerConfig;

/// Gesture and voice input timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Window after a jump during which further gestures are ignored
    pub jump_cooldown_ms: u64,
    /// How long the "resetting" flag stays raised after a reset command
    pub reset_pulse_ms: u64,
    /// Pause before restarting a speech recognizer that ended
    pub speech_restart_delay_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            jump_cooldown_ms: 300,
            reset_pulse_ms: 500,
            speech_restart_delay_ms: 100,
        }
    }
}

impl InputConfig {
    pub fn jump_cooldown(&self) -> Duration {
        Duration::from_millis(self.jump_cooldown_ms)
    }

    pub fn reset_pulse(&self) -> Duration {
        Duration::from_millis(self.reset_pulse_ms)
    }

    pub fn speech_restart_delay(&self) -> Duration {
        Duration::from_millis(self.speech_restart_delay_ms)
    }
}

/// Text-generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Base URL of the generative language API
    pub endpoint: String,
    pub model: String,
    /// API key set directly in config (takes precedence over `api_key_env`)
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Upper bound on a single generation request
    pub timeout_secs: u64,
    /// Accent color at startup and after a failed color request
    pub default_color: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            api_key_env: "API_KEY".to_string(),
            timeout_secs: 10,
            default_color: AccentColor::DEFAULT_HEX.to_string(),
        }
    }
}

impl AssistantConfig {
    /// Resolves the API key from config or the environment; empty keys count as missing
    pub fn resolve_api_key(&self) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(present)
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(present))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Conversation history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of messages retained; older ones are dropped first
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

/// Frame loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Simulation ticks (and redraws) per second
    pub fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

impl FrameConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive; `RUST_LOG` overrides it
    pub filter: String,
    /// Log file used by the terminal front end
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: PathBuf::from("jarvis.log"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    pub runner: RunnerConfig,
    pub input: InputConfig,
    pub assistant: AssistantConfig,
    pub history: HistoryConfig,
    pub frame: FrameConfig,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            runner: RunnerConfig::default(),
            input: InputConfig::default(),
            assistant: AssistantConfig::default(),
            history: HistoryConfig::default(),
            frame: FrameConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_RUNNER__GRAVITY=0.8)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(dir) = Self::find_config_dir() {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{profile}")).required(false));
        }

        // Single _ after the prefix, __ between nested fields (e.g., APP_FRAME__FPS)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .set_override("profile", profile)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Rejects values the rest of the application cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.fps == 0 {
            return Err(ConfigError::Message("frame.fps must be positive".into()));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Message(
                "history.capacity must be positive".into(),
            ));
        }
        if self.runner.score_divisor == 0 {
            return Err(ConfigError::Message(
                "runner.score_divisor must be positive".into(),
            ));
        }
        if AccentColor::parse(&self.assistant.default_color).is_none() {
            return Err(ConfigError::Message(format!(
                "assistant.default_color '{}' is not a 3 or 6 digit hex color",
                self.assistant.default_color
            )));
        }
        Ok(())
    }

    /// The configured default accent color
    pub fn default_color(&self) -> AccentColor {
        AccentColor::parse(&self.assistant.default_color).unwrap_or_default()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }
}
