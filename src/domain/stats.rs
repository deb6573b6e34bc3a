//! Market statistics snapshot shown on the dashboard

use serde::{Deserialize, Serialize};

/// Fixed token supply used to convert price into market cap
pub const TOTAL_SUPPLY: f64 = 1_000_000_000.0;

/// Smallest price the projector will ever report
pub const MIN_PRICE: f64 = 0.000_001;

/// Base liquidity persisted by a forced override
pub const OVERRIDE_BASE_LIQUIDITY: f64 = 39.29;

/// Aggregate market statistics at an instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub volume: f64,
    pub market_cap: f64,
    pub liquidity: f64,
    pub holders: u64,
    pub price: f64,
}

impl StatsSnapshot {
    /// The literal values a forced override installs
    pub const OVERRIDE: StatsSnapshot = StatsSnapshot {
        volume: 7520.0,
        market_cap: 12660.0,
        liquidity: OVERRIDE_BASE_LIQUIDITY,
        holders: 223,
        price: 0.000_012_7,
    };

    /// Market cap implied by a price over the fixed supply
    pub fn market_cap_for(price: f64) -> f64 {
        price * TOTAL_SUPPLY
    }
}
