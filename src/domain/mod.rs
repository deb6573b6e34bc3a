//! Domain Layer - Core value types
//!
//! Contains the data model shared by every simulation component:
//! - Candle: synthetic OHLC sample and the 50-candle chart window
//! - StatsSnapshot: volume / market cap / liquidity / holders / price
//! - ModeFlags: mode flags and the derived SimulationMode

pub mod candle;
pub mod mode;
pub mod stats;

pub use candle::{Candle, CandleWindow, WINDOW_SIZE};
pub use mode::{ModeFlags, SimulationMode, TickRegime};
pub use stats::{StatsSnapshot, MIN_PRICE, OVERRIDE_BASE_LIQUIDITY, TOTAL_SUPPLY};
