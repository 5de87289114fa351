//! Application configuration loaded from TOML.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use monty_hall::DoorCount;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Smallest door count offered to players.
pub const MIN_DOORS: usize = DoorCount::MIN;

/// Largest door count offered to players.
pub const MAX_DOORS: usize = 16;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Doors per round; clamped to `[MIN_DOORS, MAX_DOORS]`.
    #[serde(default = "default_door_count")]
    door_count: usize,

    /// SQLite database holding the statistics.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Pause between two doors opening in the TUI.
    #[serde(default = "default_reveal_delay_ms")]
    reveal_delay_ms: u64,

    /// Start the next round automatically this long after a resolution.
    #[serde(default)]
    auto_restart_secs: Option<u64>,

    /// Rounds per batch before the simulator yields and saves.
    #[serde(default = "default_simulation_chunk")]
    simulation_chunk: u64,
}

#[instrument]
fn default_door_count() -> usize {
    3
}

#[instrument]
fn default_db_path() -> String {
    "monty_hall.db".to_string()
}

#[instrument]
fn default_reveal_delay_ms() -> u64 {
    400
}

#[instrument]
fn default_simulation_chunk() -> u64 {
    1_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            door_count: default_door_count(),
            db_path: default_db_path(),
            reveal_delay_ms: default_reveal_delay_ms(),
            auto_restart_secs: None,
            simulation_chunk: default_simulation_chunk(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(door_count = config.door_count, db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, door_count: Option<usize>, db_path: Option<String>) -> Self {
        if let Some(door_count) = door_count {
            debug!(door_count, "Overriding door count");
            self.door_count = door_count;
        }
        if let Some(db_path) = db_path {
            debug!(db_path = %db_path, "Overriding database path");
            self.db_path = db_path;
        }
        self
    }

    /// Door count clamped to the range offered to players.
    #[instrument(skip(self))]
    pub fn doors(&self) -> DoorCount {
        clamp_door_count(self.door_count)
    }

    /// Delay between successive door openings.
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Delay before an automatic new round, if enabled.
    pub fn auto_restart(&self) -> Option<Duration> {
        self.auto_restart_secs.map(Duration::from_secs)
    }
}

/// Clamps a requested door count to `[MIN_DOORS, MAX_DOORS]`.
#[instrument]
pub fn clamp_door_count(requested: usize) -> DoorCount {
    let clamped = requested.clamp(MIN_DOORS, MAX_DOORS);
    if clamped != requested {
        warn!(requested, clamped, "Door count out of range, clamping");
    }
    DoorCount::new(clamped).unwrap_or_default()
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(*config.door_count(), 3);
        assert_eq!(config.db_path(), "monty_hall.db");
        assert_eq!(config.reveal_delay(), Duration::from_millis(400));
        assert_eq!(config.auto_restart(), None);
    }

    #[test]
    fn test_clamps_door_count() {
        assert_eq!(clamp_door_count(1).get(), 3);
        assert_eq!(clamp_door_count(8).get(), 8);
        assert_eq!(clamp_door_count(40).get(), 16);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "door_count = 5\nauto_restart_secs = 3").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.doors().get(), 5);
        assert_eq!(config.auto_restart(), Some(Duration::from_secs(3)));
        assert_eq!(*config.simulation_chunk(), 1_000);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "door_count = \"many\"").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_defaults() {
        let config = AppConfig::load_or_default("/nonexistent/monty_hall.toml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::default().with_overrides(Some(20), Some("other.db".to_string()));
        assert_eq!(config.doors().get(), 16);
        assert_eq!(config.db_path(), "other.db");
    }
}
