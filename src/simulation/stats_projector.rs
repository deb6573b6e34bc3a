//! Statistics Projector
//!
//! Derives volume / market cap / liquidity / holders / price from a single
//! liquidity seed, perturbs them on every tick, and collapses them when
//! liquidity is withdrawn.
//!
//! Seed and tick derive `market_cap` as `price * TOTAL_SUPPLY`. Crash and
//! decline scale the two by different factors.

use crate::domain::{StatsSnapshot, MIN_PRICE};
use crate::ports::RandomSource;

/// Liquidity used when the seed is non-positive or non-finite
pub const MIN_LIQUIDITY_SEED: f64 = 1.0;

/// Liquidity never ticks below this while the pool is live
pub const TICK_LIQUIDITY_FLOOR: f64 = 1000.0;

/// Maximum per-tick liquidity move
pub const TICK_VOLATILITY: f64 = 0.02;

/// Holder count moves when the roll lands above this
const HOLDER_CHANGE_THRESHOLD: f64 = 0.7;

/// Probability of losing a holder on a decline tick
const DECLINE_HOLDER_LOSS_PROBABILITY: f64 = 0.10;

/// Deterministic part of the price projection
pub fn base_price(liquidity: f64) -> f64 {
    (liquidity / 1000.0).powf(0.7) * MIN_PRICE
}

/// Project a fresh snapshot from a liquidity seed
///
/// Draw order: volume factor, holder jitter.
pub fn seed<R>(liquidity: f64, rng: &mut R) -> StatsSnapshot
where
    R: RandomSource + ?Sized,
{
    let liquidity = if liquidity.is_finite() && liquidity > 0.0 {
        liquidity
    } else {
        MIN_LIQUIDITY_SEED
    };

    let price = base_price(liquidity);
    let volume = liquidity * (0.8 + rng.next_f64() * 0.4);
    let holders = (liquidity / 50.0).floor() as u64 + (rng.next_f64() * 20.0).floor() as u64;

    StatsSnapshot {
        volume,
        market_cap: StatsSnapshot::market_cap_for(price),
        liquidity,
        holders,
        price,
    }
}

/// One live-market step
///
/// Draw order: trend sign, change, volume factor, holder roll, holder direction
/// (the last only when the roll hits).
pub fn tick<R>(prev: &StatsSnapshot, rng: &mut R) -> StatsSnapshot
where
    R: RandomSource + ?Sized,
{
    let trend_sign = if rng.next_f64() > 0.45 { 1.0 } else { -1.0 };
    let change = (rng.next_f64() * TICK_VOLATILITY * 2.0 - TICK_VOLATILITY) * trend_sign;

    let liquidity = (prev.liquidity * (1.0 + change)).max(TICK_LIQUIDITY_FLOOR);
    let price = (prev.price * (1.0 + change * 1.2)).max(MIN_PRICE);
    let market_cap = StatsSnapshot::market_cap_for(price);
    let volume = liquidity * (0.8 + rng.next_f64() * 0.4);

    let holders = if rng.next_f64() > HOLDER_CHANGE_THRESHOLD {
        if rng.next_f64() > 0.5 {
            prev.holders + 1
        } else {
            prev.holders.saturating_sub(1)
        }
    } else {
        prev.holders
    };

    StatsSnapshot {
        volume,
        market_cap,
        liquidity,
        holders: holders.max(1),
        price,
    }
}

/// Immediate collapse when liquidity is pulled
pub fn crash(prev: &StatsSnapshot) -> StatsSnapshot {
    let lost = (prev.holders as f64 * 0.8).floor() as u64;
    StatsSnapshot {
        volume: prev.volume * 0.05,
        market_cap: prev.market_cap * 0.02,
        liquidity: 0.0,
        holders: prev.holders.saturating_sub(lost).max(1),
        price: prev.price * 0.02,
    }
}

/// One post-withdrawal decay step
///
/// Draw order: holder-loss roll.
pub fn decline<R>(prev: &StatsSnapshot, rng: &mut R) -> StatsSnapshot
where
    R: RandomSource + ?Sized,
{
    let holders = if rng.next_f64() < DECLINE_HOLDER_LOSS_PROBABILITY {
        prev.holders.saturating_sub(1)
    } else {
        prev.holders
    };

    StatsSnapshot {
        volume: prev.volume * 0.95,
        market_cap: prev.market_cap * 0.98,
        liquidity: 0.0,
        holders: holders.max(1),
        price: (prev.price * 0.98).max(MIN_PRICE),
    }
}
