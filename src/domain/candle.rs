//! Candle - Synthetic OHLC sample and the fixed-size chart window
//!
//! Candles are produced only by the simulation generators. `is_green` is
//! derived from open/close and cannot be set independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of candles kept on the chart
pub const WINDOW_SIZE: usize = 50;

/// One synthetic OHLC sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CandleFields")]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    is_green: bool,
}

/// Wire shape accepted on deserialization; any `isGreen` is ignored and
/// recomputed by `Candle::new`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandleFields {
    time: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl From<CandleFields> for Candle {
    fn from(f: CandleFields) -> Self {
        Candle::new(f.time, f.open, f.high, f.low, f.close)
    }
}

impl Candle {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            is_green: close > open,
        }
    }

    /// True iff close > open
    pub fn is_green(&self) -> bool {
        self.is_green
    }

    /// Validate OHLC data integrity
    pub fn is_valid(&self) -> bool {
        self.low <= self.open.min(self.close)
            && self.open.max(self.close) <= self.high
            && self.is_green == (self.close > self.open)
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.open.is_finite()
    }
}

/// Oldest-first sliding window of candles
///
/// Holds at most `capacity` candles; pushing onto a full window evicts the
/// oldest one.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    candles: VecDeque<Candle>,
    capacity: usize,
}

impl CandleWindow {
    /// Create an empty window with the default chart size
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the whole window (restart from a fresh history)
    pub fn reset(&mut self, candles: Vec<Candle>) {
        self.candles = candles.into();
        while self.candles.len() > self.capacity {
            self.candles.pop_front();
        }
    }

    /// Append a candle, evicting the oldest once full
    pub fn push(&mut self, candle: Candle) {
        self.candles.push_back(candle);
        if self.candles.len() > self.capacity {
            self.candles.pop_front();
        }
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }

    /// Copy out the candles, oldest first
    pub fn to_vec(&self) -> Vec<Candle> {
        self.candles.iter().copied().collect()
    }
}

impl Default for CandleWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candle_at(minute: i64, close: f64) -> Candle {
        let time = DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minute);
        Candle::new(time, 1.0, close.max(1.0), close.min(1.0), close)
    }

    #[test]
    fn test_is_green_derived_from_close() {
        assert!(candle_at(0, 1.5).is_green());
        assert!(!candle_at(0, 0.5).is_green());
        // flat candle is red
        assert!(!candle_at(0, 1.0).is_green());
    }

    #[test]
    fn test_is_valid_rejects_broken_wicks() {
        let now = Utc::now();
        assert!(Candle::new(now, 10.0, 12.0, 9.0, 11.0).is_valid());
        assert!(!Candle::new(now, 10.0, 10.5, 9.0, 11.0).is_valid());
        assert!(!Candle::new(now, 10.0, 12.0, 10.5, 11.0).is_valid());
        assert!(!Candle::new(now, 10.0, f64::INFINITY, 9.0, 11.0).is_valid());
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = CandleWindow::with_capacity(3);
        for i in 0..5 {
            window.push(candle_at(i, 1.0 + i as f64));
        }

        assert_eq!(window.len(), 3);
        let closes: Vec<f64> = window.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![3.0, 4.0, 5.0]);
        assert_eq!(window.last().unwrap().close, 5.0);
    }

    #[test]
    fn test_reset_truncates_to_capacity() {
        let mut window = CandleWindow::with_capacity(2);
        window.reset((0..4).map(|i| candle_at(i, 2.0)).collect());
        assert_eq!(window.len(), 2);
        assert_eq!(window.to_vec()[0].time, candle_at(2, 2.0).time);
    }

    #[test]
    fn test_default_capacity() {
        let window = CandleWindow::default();
        assert!(window.is_empty());
        assert_eq!(window.capacity(), WINDOW_SIZE);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(candle_at(0, 2.0)).unwrap();
        assert_eq!(json["isGreen"], true);
        assert_eq!(json["close"], 2.0);
        assert!(json["time"].as_str().unwrap().starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_deserialize_recomputes_is_green() {
        let json = r#"{"time":"2026-01-01T00:00:00Z","open":1.0,"high":2.5,"low":0.5,"close":2.0,"isGreen":false}"#;
        let candle: Candle = serde_json::from_str(json).unwrap();
        assert!(candle.is_green());
        assert_eq!(candle.is_green(), candle.close > candle.open);
        assert!(candle.is_valid());

        let red = r#"{"time":"2026-01-01T00:00:00Z","open":2.0,"high":2.5,"low":0.5,"close":1.0,"isGreen":true}"#;
        let candle: Candle = serde_json::from_str(red).unwrap();
        assert!(!candle.is_green());
    }

    #[test]
    fn test_serde_round_trip_keeps_candle() {
        let original = candle_at(3, 0.25);
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(serde_json::from_str::<Candle>(&json).unwrap(), original);
    }
}
