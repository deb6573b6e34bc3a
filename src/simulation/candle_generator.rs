//! Candle Generator - Synthetic OHLC history and per-tick candles
//!
//! `initialize` walks a seed price forward to build the chart history.
//! `tick` derives the next candle from the previous close under either the
//! independent pump regime or the normal synced regime.
//!
//! Draw order is fixed so scripted random sources give exact results:
//! - history step: volatility, change, high wick, low wick
//! - pump tick: branch, change, wick
//! - normal tick: change, wick

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Candle, TickRegime, WINDOW_SIZE};
use crate::ports::RandomSource;

/// Spacing between history candles
pub const HISTORY_STEP_SECS: i64 = 60;

/// Probability that a pump tick takes the "up" branch
pub const PUMP_UP_PROBABILITY: f64 = 0.75;

/// Builds synthetic candles
#[derive(Debug, Clone)]
pub struct CandleGenerator {
    history_len: usize,
    history_step: Duration,
}

impl CandleGenerator {
    pub fn new(history_len: usize, history_step: Duration) -> Self {
        Self {
            history_len,
            history_step,
        }
    }

    /// Build the initial history ending at `now`
    ///
    /// Returns an empty history for a non-positive or non-finite seed price.
    pub fn initialize<R>(&self, seed_price: f64, now: DateTime<Utc>, rng: &mut R) -> Vec<Candle>
    where
        R: RandomSource + ?Sized,
    {
        if !seed_price.is_finite() || seed_price <= 0.0 {
            return Vec::new();
        }

        let n = self.history_len;
        let mut price = seed_price;
        let mut candles = Vec::with_capacity(n);

        for i in 0..n {
            let volatility = 0.05 + rng.next_f64() * 0.05;
            let trend = (i as f64 * 0.1).sin() * 0.02;
            let change = (rng.next_f64() - 0.5) * volatility + trend;

            let open = price;
            let close = price * (1.0 + change);
            let high = open.max(close) * (1.0 + rng.next_f64() * 0.03);
            let low = open.min(close) * (1.0 - rng.next_f64() * 0.03);

            let steps_back = (n - 1 - i) as i32;
            let time = now - self.history_step * steps_back;

            candles.push(Candle::new(time, open, high, low, close));
            price = close;
        }

        candles
    }

    /// Derive the next candle from `previous`
    ///
    /// `reference_price` only applies to the normal regime; a missing or
    /// non-positive reference falls back to the previous close.
    pub fn tick<R>(
        &self,
        previous: &Candle,
        regime: TickRegime,
        reference_price: Option<f64>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Candle
    where
        R: RandomSource + ?Sized,
    {
        let close = match regime {
            TickRegime::IndependentPump => {
                let change = if rng.next_f64() < PUMP_UP_PROBABILITY {
                    rng.next_f64() * 0.15 + 0.05
                } else {
                    (rng.next_f64() - 0.5) * 0.08
                };
                previous.close * (1.0 + change)
            }
            TickRegime::Normal => {
                let base = reference_price
                    .filter(|p| p.is_finite() && *p > 0.0)
                    .unwrap_or(previous.close);
                let change = (rng.next_f64() - 0.5) * 0.02;
                base * (1.0 + change)
            }
        };

        let open = previous.close;
        let wick = 1.0 + rng.next_f64() * 0.02;
        let high = open.max(close) * wick;
        let low = open.min(close) * (2.0 - wick);

        Candle::new(now.max(previous.time), open, high, low, close)
    }
}

impl Default for CandleGenerator {
    fn default() -> Self {
        Self::new(WINDOW_SIZE, Duration::seconds(HISTORY_STEP_SECS))
    }
}
