//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `PSYCHEFIT_CONFIG` environment variable
//! 3. `<config_dir>/psychefit/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing file at the default location is not an error: the quiz runs
//! with compiled defaults. A file named explicitly (CLI or environment)
//! must exist and parse.

use crate::scoring::MissingAnswerPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PSYCHEFIT_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Question bank file (embedded bank if not specified)
    #[serde(default)]
    pub questions: Option<PathBuf>,

    /// Attachment detail file (embedded table if not specified)
    #[serde(default)]
    pub details: Option<PathBuf>,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UI timers, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause after an answer before the next question is shown
    #[serde(default = "default_answer_delay_ms")]
    pub answer_delay_ms: u64,

    /// Length of the reflection stage
    #[serde(default = "default_reflection_ms")]
    pub reflection_ms: u64,

    /// Progress animation tick
    #[serde(default = "default_progress_tick_ms")]
    pub progress_tick_ms: u64,
}

impl TimingConfig {
    /// All timers zeroed, used for scripted runs and tests
    pub fn immediate() -> Self {
        Self {
            answer_delay_ms: 0,
            reflection_ms: 0,
            progress_tick_ms: 0,
        }
    }

    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    pub fn reflection(&self) -> Duration {
        Duration::from_millis(self.reflection_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            answer_delay_ms: default_answer_delay_ms(),
            reflection_ms: default_reflection_ms(),
            progress_tick_ms: default_progress_tick_ms(),
        }
    }
}

/// Scoring options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub missing_answers: MissingAnswerPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_answer_delay_ms() -> u64 {
    250
}

fn default_reflection_ms() -> u64 {
    3000
}

fn default_progress_tick_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; the file must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }
        if self.timing.reflection_ms > 0 && self.timing.progress_tick_ms == 0 {
            return Err(Error::Config(
                "timing.progress_tick_ms must be > 0 when reflection_ms > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolves which config file to use, following the priority order above
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Path of the config file that will be read, if any
    ///
    /// Returns the path and whether it was named explicitly.
    pub fn locate(&self) -> Option<(PathBuf, bool)> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some((path.clone(), true));
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some((PathBuf::from(path), true));
            }
        }

        // Priority 3: Platform config directory
        default_config_path().map(|p| (p, false))
    }

    /// Load the effective configuration
    pub fn resolve(&self) -> Result<TomlConfig> {
        match self.locate() {
            Some((path, true)) => {
                let config = TomlConfig::load(&path)?;
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Some((path, false)) if path.exists() => {
                let config = TomlConfig::load(&path)?;
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Some((path, false)) => {
                info!("No config file at {}, using defaults", path.display());
                Ok(TomlConfig::default())
            }
            // Priority 4: Compiled defaults
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// `<config_dir>/psychefit/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("psychefit").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.timing.answer_delay_ms, 250);
        assert_eq!(config.timing.reflection_ms, 3000);
        assert_eq!(config.timing.progress_tick_ms, 100);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.scoring.missing_answers, MissingAnswerPolicy::ZeroContribution);
        assert!(config.questions.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            [timing]
            answer_delay_ms = 0

            [scoring]
            missing_answers = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.answer_delay_ms, 0);
        assert_eq!(config.timing.reflection_ms, 3000);
        assert_eq!(config.scoring.missing_answers, MissingAnswerPolicy::Reject);
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result = TomlConfig::from_toml_str("[logging]\nlevel = \"chatty\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_tick_with_reflection_rejected() {
        let result = TomlConfig::from_toml_str("[timing]\nprogress_tick_ms = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_immediate_timing() {
        let timing = TimingConfig::immediate();
        assert_eq!(timing.answer_delay(), Duration::ZERO);
        assert_eq!(timing.reflection(), Duration::ZERO);
    }
}
