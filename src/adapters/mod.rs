//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Persistence: JSON file seed store
//! - CLI: Command-line interface definitions

pub mod cli;
pub mod persistence;

pub use cli::CliApp;
pub use persistence::FileSeedStore;
