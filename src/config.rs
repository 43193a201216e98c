use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::game::{DEFAULT_SIZE, HIGH_SCORE_KEY};

/// Largest board the terminal view lays out.
pub const MAX_SIZE: usize = 8;

/// Board settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: usize,
    /// Fixed seed for reproducible tile spawns; OS entropy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: DEFAULT_SIZE,
            seed: None,
        }
    }
}

/// Where the high score is persisted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub high_score_path: PathBuf,
    pub high_score_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            high_score_path: PathBuf::from("high_score.json"),
            high_score_key: HIGH_SCORE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: PathBuf::from("terminal-2048.log"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.size < 2 || self.game.size > MAX_SIZE {
            return Err(ConfigError::Validation(format!(
                "game.size must be in 2..={MAX_SIZE} (got {})",
                self.game.size
            )));
        }
        if self.storage.high_score_key.is_empty() {
            return Err(ConfigError::Validation(
                "storage.high_score_key must not be empty".into(),
            ));
        }
        if self.storage.high_score_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.high_score_path must not be empty".into(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
