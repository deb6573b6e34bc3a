//! Crash and slow-decline candles after liquidity is withdrawn
//!
//! The crash candle drops the price to 1.5% of the last close in one step.
//! Every decline tick afterwards drifts down 0.5-2.5%, with a 10% chance of
//! a 1-4% dead-cat bounce instead.

use chrono::{DateTime, Utc};

use crate::domain::Candle;
use crate::ports::RandomSource;

/// Fraction of the last close that survives the crash
pub const CRASH_RETAIN_RATIO: f64 = 0.015;

/// Probability of a dead-cat bounce on a decline tick
pub const BOUNCE_PROBABILITY: f64 = 0.10;

/// The one-shot collapse candle
pub fn crash_candle(previous: &Candle, now: DateTime<Utc>) -> Candle {
    let crash_price = previous.close * CRASH_RETAIN_RATIO;
    Candle::new(
        now.max(previous.time),
        previous.close,
        previous.close * 1.001,
        crash_price,
        crash_price,
    )
}

/// One step of the post-crash decline
///
/// Draw order: bounce roll, change, high wick, low wick.
pub fn decline_candle<R>(previous: &Candle, now: DateTime<Utc>, rng: &mut R) -> Candle
where
    R: RandomSource + ?Sized,
{
    let change = if rng.next_f64() < BOUNCE_PROBABILITY {
        rng.next_f64() * 0.03 + 0.01
    } else {
        -(rng.next_f64() * 0.02 + 0.005)
    };

    let open = previous.close;
    let close = open * (1.0 + change);
    let high = open.max(close) * (1.0 + rng.next_f64() * 0.005);
    let low = open.min(close) * (1.0 - rng.next_f64() * 0.01);

    Candle::new(now.max(previous.time), open, high, low, close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ScriptedRandom, SeededRandom};
    use approx::assert_relative_eq;

    fn prev(close: f64) -> Candle {
        Candle::new(Utc::now(), close, close, close, close)
    }

    #[test]
    fn test_crash_candle_shape() {
        let c = crash_candle(&prev(200.0), Utc::now());

        assert_eq!(c.open, 200.0);
        assert_relative_eq!(c.high, 200.2, max_relative = 1e-12);
        assert_relative_eq!(c.low, 3.0, max_relative = 1e-12);
        assert_eq!(c.close, c.low);
        assert!(!c.is_green());
        assert!(c.is_valid());
    }

    #[test]
    fn test_decline_branch() {
        // roll 0.5 => decline, change -(0.5*0.02+0.005) = -1.5%
        let mut rng = ScriptedRandom::new([0.5, 0.5, 0.0, 0.0]);
        let c = decline_candle(&prev(100.0), Utc::now(), &mut rng);

        assert_relative_eq!(c.close, 98.5, max_relative = 1e-12);
        assert_eq!(c.open, 100.0);
        assert_eq!(c.high, 100.0);
        assert_relative_eq!(c.low, 98.5, max_relative = 1e-12);
        assert!(!c.is_green());
    }

    #[test]
    fn test_dead_cat_bounce() {
        // roll 0.05 => bounce, change 1.0*0.03+0.01 = +4%
        let mut rng = ScriptedRandom::new([0.05, 1.0, 1.0, 1.0]);
        let c = decline_candle(&prev(100.0), Utc::now(), &mut rng);

        assert_relative_eq!(c.close, 104.0, max_relative = 1e-12);
        assert!(c.is_green());
        assert_relative_eq!(c.high, 104.0 * 1.005, max_relative = 1e-12);
        assert_relative_eq!(c.low, 99.0, max_relative = 1e-12);
    }

    #[test]
    fn test_decline_keeps_invariants() {
        let mut rng = SeededRandom::new(11);
        let mut last = crash_candle(&prev(1.0), Utc::now());
        for _ in 0..1000 {
            let c = decline_candle(&last, Utc::now(), &mut rng);
            assert!(c.is_valid());
            assert!(c.close > 0.0);
            last = c;
        }
        // drifts down on balance
        assert!(last.close < 0.015);
    }
}
