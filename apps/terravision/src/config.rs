//! # Configuration
//!
//! Optional `terravision.toml`. Every field has a default, so an absent file
//! (at the default location) is the same as an empty one.
//!
//! ```toml
//! [storage]
//! path = "terravision.redb"
//!
//! [timing]
//! type_interval_ms = 26
//! message_pause_ms = 540
//! completion_pad_ms = 700
//! countdown_tick_ms = 900
//! ai_line_ms = 1200
//!
//! [log]
//! format = "text"   # or "json"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use terravision_core::primitives::{
    AI_LINE_INTERVAL_MS, COMPLETION_PAD_MS, COUNTDOWN_TICK_MS, MESSAGE_PAUSE_MS, MIN_CUE_MS,
    TYPE_INTERVAL_MS,
};
use terravision_core::{
    JourneyTiming, LocalTime, Millis, ShellConfig, TerraError, TimerSupport, TransitionTiming,
};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "terravision.toml";

/// Database file used when neither the config nor `--database` names one.
pub const DEFAULT_DATABASE_PATH: &str = "terravision.redb";

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub type_interval_ms: Millis,
    pub message_pause_ms: Millis,
    pub completion_pad_ms: Millis,
    pub countdown_tick_ms: Millis,
    pub ai_line_ms: Millis,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            type_interval_ms: TYPE_INTERVAL_MS,
            message_pause_ms: MESSAGE_PAUSE_MS,
            completion_pad_ms: COMPLETION_PAD_MS,
            countdown_tick_ms: COUNTDOWN_TICK_MS,
            ai_line_ms: AI_LINE_INTERVAL_MS,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse the `TERRAVISION_LOG_FORMAT` value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<LogFormat> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub format: LogFormat,
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub timing: TimingConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Parse a config document.
    pub fn from_toml_str(text: &str) -> Result<Self, TerraError> {
        toml::from_str(text).map_err(|e| TerraError::ConfigError(e.to_string()))
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is optional and falls
    /// back to defaults when missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, TerraError> {
        let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(TerraError::ConfigError(format!(
                "Cannot read config '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Settings for the shell. `instant` reports timers as unavailable so
    /// every timed step completes synchronously.
    #[must_use]
    pub fn shell_config(&self, instant: bool, local_time: LocalTime) -> ShellConfig {
        let support = if instant {
            TimerSupport::Unavailable
        } else {
            TimerSupport::Available
        };
        ShellConfig {
            transition: TransitionTiming {
                type_interval_ms: self.timing.type_interval_ms,
                message_pause_ms: self.timing.message_pause_ms,
                completion_pad_ms: self.timing.completion_pad_ms,
                support,
            },
            journey: JourneyTiming {
                countdown_tick_ms: self.timing.countdown_tick_ms,
                ai_line_ms: self.timing.ai_line_ms,
                min_cue_ms: MIN_CUE_MS,
                support,
            },
            local_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = AppConfig::from_toml_str("").expect("parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            "[timing]\ntype_interval_ms = 5\n\n[log]\nformat = \"json\"\n",
        )
        .expect("parse");
        assert_eq!(config.timing.type_interval_ms, 5);
        assert_eq!(config.timing.message_pause_ms, MESSAGE_PAUSE_MS);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml_str("[timing]\ntick = 1\n");
        assert!(matches!(err, Err(TerraError::ConfigError(_))));
    }

    #[test]
    fn instant_disables_timers() {
        let shell = AppConfig::default().shell_config(true, LocalTime::new(7, 0));
        assert!(!shell.transition.support.is_available());
        assert!(!shell.journey.support.is_available());
        assert_eq!(shell.journey.countdown_tick_ms, COUNTDOWN_TICK_MS);
    }

    #[test]
    fn log_format_parse() {
        assert_eq!(LogFormat::parse(" JSON "), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("yaml"), None);
    }
}
