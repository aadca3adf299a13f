//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `equilibria-config.yaml` at the
//! project root. Every field has a default, so a missing file, an empty
//! file, or a partial file are all valid.

use std::path::Path;

use equilibria_core::GameOptions;
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
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Update mode and default run length.
    #[serde(default)]
    pub game: GameOptions,

    /// Periodic debug logging.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Parameters of the absent-minded driver games.
    #[serde(default)]
    pub driver: DriverParams,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `EQUILIBRIA_LOG` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Debug observer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DebugConfig {
    /// Log the template every this many steps. 0 disables the observer.
    #[serde(default = "default_debug_period")]
    pub period: u64,

    /// `minijinja` template rendered against the environment.
    #[serde(default = "default_debug_template")]
    pub template: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            period: default_debug_period(),
            template: default_debug_template(),
        }
    }
}

/// Parameters shared by the absent-minded driver games.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverParams {
    /// Deployment episodes.
    #[serde(default = "default_m")]
    pub m: u32,

    /// Target probability of catastrophe.
    #[serde(default = "default_eps")]
    pub eps: f64,

    /// Probability that a training episode is modelled.
    #[serde(default = "default_p_mod")]
    pub p_mod: f64,

    /// Reward for never defecting.
    #[serde(default)]
    pub r_n: f64,

    /// Reward for defecting at the right time.
    #[serde(default = "default_r_m")]
    pub r_m: f64,

    /// Reward for getting caught.
    #[serde(default)]
    pub r_f: f64,

    /// Number of defections that cause catastrophe.
    #[serde(default = "default_d")]
    pub d: u32,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            m: default_m(),
            eps: default_eps(),
            p_mod: default_p_mod(),
            r_n: 0.0,
            r_m: default_r_m(),
            r_f: 0.0,
            d: default_d(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter
    /// directive. `RUST_LOG` takes precedence at startup.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Override the level with `EQUILIBRIA_LOG` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("EQUILIBRIA_LOG") {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_debug_period() -> u64 {
    100
}

fn default_debug_template() -> String {
    "n = {{ n }}; p = {{ p }}; PC = {{ PC }}".to_owned()
}

const fn default_m() -> u32 {
    100
}

const fn default_eps() -> f64 {
    0.01
}

const fn default_p_mod() -> f64 {
    0.9
}

const fn default_r_m() -> f64 {
    1.0
}

const fn default_d() -> u32 {
    2
}

fn default_log_level() -> String {
    "info".to_owned()
}
