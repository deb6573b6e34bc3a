//! Simulation Parameters
//!
//! Seeds and timer cadences for a simulation session. Defaults match the
//! dashboard's stock behaviour: 3s synced candles, 1s pump candles, 2s
//! statistics, 8s/5s post-crash decline and a 5s override delay.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::TickRegime;

/// Main session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed price for the initial candle history
    pub initial_price: f64,
    /// Liquidity seed when nothing has been persisted yet
    pub initial_liquidity: f64,
    /// Start in the independent pump regime
    pub chart_independent: bool,
    /// Fixed RNG seed for reproducible sessions
    pub rng_seed: Option<u64>,
    /// Timer cadences
    pub cadence: CadenceConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_price: 0.000_001,
            initial_liquidity: 1000.0,
            chart_independent: false,
            rng_seed: None,
            cadence: CadenceConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_chart_independent(mut self, independent: bool) -> Self {
        self.chart_independent = independent;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_initial_price(mut self, price: f64) -> Self {
        self.initial_price = price;
        self
    }

    pub fn with_initial_liquidity(mut self, liquidity: f64) -> Self {
        self.initial_liquidity = liquidity;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.initial_price.is_finite() || self.initial_price <= 0.0 {
            return Err(ParamsError::InvalidInitialPrice(self.initial_price));
        }
        if !self.initial_liquidity.is_finite() || self.initial_liquidity <= 0.0 {
            return Err(ParamsError::InvalidInitialLiquidity(self.initial_liquidity));
        }
        self.cadence.validate()
    }
}

/// Timer cadences in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Synced (normal) candle tick
    pub candle_tick_ms: u64,
    /// Independent pump candle tick
    pub pump_tick_ms: u64,
    /// Statistics tick
    pub stats_tick_ms: u64,
    /// Post-crash candle decline tick
    pub candle_decline_ms: u64,
    /// Post-crash statistics decay tick
    pub stats_decline_ms: u64,
    /// Delay before a forced override lands
    pub override_delay_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            candle_tick_ms: 3000,
            pump_tick_ms: 1000,
            stats_tick_ms: 2000,
            candle_decline_ms: 8000,
            stats_decline_ms: 5000,
            override_delay_ms: 5000,
        }
    }
}

impl CadenceConfig {
    /// Candle period for a drift regime
    pub fn candle_period(&self, regime: TickRegime) -> Duration {
        match regime {
            TickRegime::Normal => Duration::from_millis(self.candle_tick_ms),
            TickRegime::IndependentPump => Duration::from_millis(self.pump_tick_ms),
        }
    }

    pub fn stats_period(&self) -> Duration {
        Duration::from_millis(self.stats_tick_ms)
    }

    pub fn candle_decline_period(&self) -> Duration {
        Duration::from_millis(self.candle_decline_ms)
    }

    pub fn stats_decline_period(&self) -> Duration {
        Duration::from_millis(self.stats_decline_ms)
    }

    pub fn override_delay(&self) -> Duration {
        Duration::from_millis(self.override_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let periodic = [
            ("candle_tick_ms", self.candle_tick_ms),
            ("pump_tick_ms", self.pump_tick_ms),
            ("stats_tick_ms", self.stats_tick_ms),
            ("candle_decline_ms", self.candle_decline_ms),
            ("stats_decline_ms", self.stats_decline_ms),
        ];
        for (name, ms) in periodic {
            if ms == 0 {
                return Err(ParamsError::ZeroPeriod(name));
            }
        }
        Ok(())
    }
}

/// Parameter validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid initial price: {0} (must be > 0)")]
    InvalidInitialPrice(f64),
    #[error("Invalid initial liquidity: {0} (must be > 0)")]
    InvalidInitialLiquidity(f64),
    #[error("Timer period {0} must be > 0")]
    ZeroPeriod(&'static str),
}
