//! Market Sim - Synthetic Token Market Simulator Library
//!
//! Animates a candlestick chart and a statistics dashboard for a synthetic
//! token under drift, pump, liquidity-withdrawal and override regimes.
//!
//! # Modules
//!
//! - `domain`: Core types (Candle, CandleWindow, StatsSnapshot, ModeFlags)
//! - `ports`: Trait abstractions (RandomSource, SeedStore) and timer handles
//! - `simulation`: Candle generator, crash/decline, stats projector, override controller
//! - `application`: Simulation session driving the timers
//! - `adapters`: External implementations (seed file, CLI)
//! - `config`: Configuration loading and validation

pub mod domain;
pub mod ports;
pub mod simulation;
pub mod adapters;
pub mod config;
pub mod application;
