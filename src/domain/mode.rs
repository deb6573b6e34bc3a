//! Simulation mode flags and their precedence rules
//!
//! The surrounding UI drives four flags (withdrawn, independent chart,
//! override mode, frozen values); the forced override command adds a fifth.
//! `SimulationMode` is derived from them:
//!
//! - `Withdrawn` wins over everything and never clears
//! - `Overridden` layers on top of normal/pump (statistics frozen, candles keep moving)
//! - `IndependentPump` vs `Normal` selects the candle drift regime

use serde::{Deserialize, Serialize};

/// Externally visible simulation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimulationMode {
    Normal,
    IndependentPump,
    Withdrawn,
    Overridden,
}

impl SimulationMode {
    pub fn description(&self) -> &'static str {
        match self {
            SimulationMode::Normal => "Synced drift around the reference price",
            SimulationMode::IndependentPump => "Independent pump - chart decoupled from reference",
            SimulationMode::Withdrawn => "Liquidity withdrawn - crash and decline only",
            SimulationMode::Overridden => "Statistics overridden by operator",
        }
    }
}

/// Drift regime for ordinary candle ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickRegime {
    /// Small symmetric moves around an external reference price
    Normal,
    /// Mostly-up moves, ignores the reference price
    IndependentPump,
}

/// Raw flags consumed by the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeFlags {
    pub liquidity_withdrawn: bool,
    pub chart_independent: bool,
    /// External override flag - suspends candle ticking
    pub override_mode: bool,
    /// Suspends statistics ticking only
    pub frozen_values: bool,
    /// Set by the forced override command - suspends statistics ticking only
    pub overridden: bool,
}

impl ModeFlags {
    pub fn new(chart_independent: bool) -> Self {
        Self {
            chart_independent,
            ..Self::default()
        }
    }

    /// Enter the withdrawn regime. Returns false if already withdrawn.
    pub fn withdraw(&mut self) -> bool {
        if self.liquidity_withdrawn {
            return false;
        }
        self.liquidity_withdrawn = true;
        true
    }

    pub fn mode(&self) -> SimulationMode {
        if self.liquidity_withdrawn {
            SimulationMode::Withdrawn
        } else if self.overridden {
            SimulationMode::Overridden
        } else if self.chart_independent {
            SimulationMode::IndependentPump
        } else {
            SimulationMode::Normal
        }
    }

    /// Regime for the next ordinary candle tick, `None` while ticking is suspended
    pub fn candle_regime(&self) -> Option<TickRegime> {
        if self.liquidity_withdrawn || self.override_mode {
            None
        } else if self.chart_independent {
            Some(TickRegime::IndependentPump)
        } else {
            Some(TickRegime::Normal)
        }
    }

    pub fn stats_ticking(&self) -> bool {
        !(self.liquidity_withdrawn || self.overridden || self.frozen_values)
    }
}
