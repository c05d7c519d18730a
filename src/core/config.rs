//=========================================================================
// Configuration
//=========================================================================
//
// Settings for the scene manager and its optional update loop.
//
// Loaded from TOML (or built in code) and consumed by
// SceneManagerBuilder::from_config and SceneRuntime::new.
//
// Example (scenes.toml):
//   enable_transitions = true
//   default_transition_duration_ms = 500
//   auto_update = false
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== ConfigError =========================================================

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

//=== SceneManagerConfig ==================================================

/// Scene manager settings.
///
/// # Default Values
///
/// - **enable_transitions**: true
/// - **default_transition_duration_ms**: 1000
/// - **auto_update**: true
/// - **tick_rate**: 60.0 updates per second
/// - **event_capacity**: 128 events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneManagerConfig {
    /// Run timed transitions between scenes. When false every switch is direct.
    pub enable_transitions: bool,

    /// Transition length used when a switch gives no duration.
    pub default_transition_duration_ms: u64,

    /// Start a background update loop with the runtime.
    pub auto_update: bool,

    /// Updates per second of the background loop.
    pub tick_rate: f64,

    /// Undelivered events kept before new ones are dropped.
    pub event_capacity: usize,
}

impl SceneManagerConfig {
    pub fn default_transition_duration(&self) -> Duration {
        Duration::from_millis(self.default_transition_duration_ms)
    }

    /// Time between update-loop ticks, or `None` if `tick_rate` is not
    /// a usable positive rate.
    pub fn frame_duration(&self) -> Option<Duration> {
        frame_duration(self.tick_rate)
    }

    /// Checks ranges that the manager and runtime rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be positive".to_string(),
            ));
        }
        if self.frame_duration().is_none() {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be a positive finite rate, got {}",
                self.tick_rate
            )));
        }
        Ok(())
    }

    //--- Serialization ----------------------------------------------------

    /// Parses and validates configuration from a TOML string. Missing
    /// keys keep defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Loads configuration from a `.toml` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::check_format(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Writes configuration to a `.toml` file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        Self::check_format(path)?;
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    fn check_format(path: &Path) -> Result<(), ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(()),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Converts a tick rate to the time between ticks.
///
/// Rejects non-finite and non-positive rates, and rates so small the
/// period overflows.
pub(crate) fn frame_duration(tick_rate: f64) -> Option<Duration> {
    if !tick_rate.is_finite() || tick_rate <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / tick_rate).ok()
}

impl Default for SceneManagerConfig {
    fn default() -> Self {
        Self {
            enable_transitions: true,
            default_transition_duration_ms: 1000,
            auto_update: true,
            tick_rate: 60.0,
            event_capacity: 128,
        }
    }
}

//=== Tests ===============================================================
