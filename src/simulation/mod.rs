//! Simulation Layer - Synthetic market data generators
//!
//! Pure functions and small state machines, no timers or I/O:
//! - Candle generator: initial history and per-tick candles (pump / normal)
//! - Crash: collapse candle and slow-decline tail after a withdrawal
//! - Stats projector: seed, tick, crash and decay of market statistics
//! - Override controller: delayed replacement of statistics by fixed values
//!
//! All randomness comes in through `ports::RandomSource`.

pub mod candle_generator;
pub mod crash;
pub mod override_controller;
pub mod params;
pub mod stats_projector;

pub use candle_generator::CandleGenerator;
pub use crash::{crash_candle, decline_candle};
pub use override_controller::{OverrideController, OverrideOutcome, OverrideState};
pub use params::{CadenceConfig, ParamsError, SimulationConfig};
