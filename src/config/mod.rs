//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, LoggingSection, PersistenceSection, SimulationSection, load_config,
    SEED_FILE_ENV,
};
