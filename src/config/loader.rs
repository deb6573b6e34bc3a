//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching market-sim.toml structure.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::simulation::{CadenceConfig, SimulationConfig};

/// Environment variable overriding `[persistence] seed_file`
pub const SEED_FILE_ENV: &str = "MARKET_SIM_SEED_FILE";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure matching market-sim.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub simulation: SimulationSection,
    #[serde(default)]
    pub cadence: CadenceConfig,
    #[serde(default)]
    pub persistence: PersistenceSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Simulation seeds section
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
    /// Seed price for the initial candle history
    pub initial_price: f64,
    /// Liquidity seed used until an override persists one
    pub initial_liquidity: f64,
    /// Start in the independent pump regime
    #[serde(default)]
    pub chart_independent: bool,
    /// Fixed RNG seed (omit for a fresh random session)
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Seed persistence section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistenceSection {
    /// JSON file holding the base liquidity (omit to keep it in memory)
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl PersistenceSection {
    /// Get the seed file path (env var takes precedence, `~` expanded)
    pub fn get_seed_file(&self) -> Option<PathBuf> {
        let raw = std::env::var(SEED_FILE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.seed_file.clone())?;
        Some(PathBuf::from(shellexpand::tilde(&raw).into_owned()))
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        SimulationConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {:?}, got {}",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }
}

impl From<&Config> for SimulationConfig {
    fn from(config: &Config) -> Self {
        SimulationConfig {
            initial_price: config.simulation.initial_price,
            initial_liquidity: config.simulation.initial_liquidity,
            chart_independent: config.simulation.chart_independent,
            rng_seed: config.simulation.rng_seed,
            cadence: config.cadence.clone(),
        }
    }
}
