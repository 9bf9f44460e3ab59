//! Configuration loading and typed config structures.
//!
//! The configuration lives in `bingo-config.yaml` in the working
//! directory. Every field has a default, so a missing file, an empty file,
//! or a file naming only a few keys all produce a usable configuration.
//!
//! Environment variables override the file:
//! - `BINGO_HOST` overrides `server.host`
//! - `BINGO_PORT` overrides `server.port`
//! - `BINGO_DRAW_INTERVAL_MS` overrides `game.draw_interval_ms`

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not acceptable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BingoConfig {
    /// Draw loop settings.
    #[serde(default)]
    pub game: GameConfig,

    /// Listening address for the client and operator endpoints.
    #[serde(default)]
    pub server: ListenConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BingoConfig {
    /// Load configuration from `path` if it exists, otherwise use the
    /// defaults. Environment overrides are applied in both cases.
    ///
    /// # Errors
    ///
    /// Returns any error from [`BingoConfig::from_file`] or
    /// [`BingoConfig::apply_env_overrides`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a YAML file and apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML and
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `BINGO_*` environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable does not parse or
    /// the resulting configuration is out of range.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("BINGO_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("BINGO_PORT") {
            self.server.port = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("invalid BINGO_PORT {val:?}: {e}"),
            })?;
        }
        if let Ok(val) = std::env::var("BINGO_DRAW_INTERVAL_MS") {
            self.game.draw_interval_ms = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("invalid BINGO_DRAW_INTERVAL_MS {val:?}: {e}"),
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.game.draw_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "game.draw_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Draw loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Delay between two draws, in milliseconds.
    #[serde(default = "default_draw_interval_ms")]
    pub draw_interval_ms: u64,

    /// Seed for card generation and draw order. `None` uses OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    /// The inter-draw delay as a [`Duration`].
    pub const fn draw_interval(&self) -> Duration {
        Duration::from_millis(self.draw_interval_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            draw_interval_ms: default_draw_interval_ms(),
            seed: None,
        }
    }
}

/// Listening address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListenConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
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

const fn default_draw_interval_ms() -> u64 {
    1500
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    String::from("info")
}
