//! Override Controller
//!
//! Operator escape hatch: once triggered, statistics stop ticking and after
//! a fixed delay the snapshot is replaced by literal values. The controller
//! only tracks state and timing; the session owns the timer that applies it.

use std::time::Duration;
use tokio::time::Instant;

use crate::domain::{StatsSnapshot, OVERRIDE_BASE_LIQUIDITY};

/// Default delay between the trigger and the replacement
pub const DEFAULT_OVERRIDE_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideState {
    Idle,
    Pending { triggered_at: Instant },
    Applied,
}

/// What a due override installs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideOutcome {
    pub stats: StatsSnapshot,
    /// Base liquidity to persist for later sessions
    pub base_liquidity: f64,
}

#[derive(Debug, Clone)]
pub struct OverrideController {
    delay: Duration,
    state: OverrideState,
}

impl OverrideController {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: OverrideState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> OverrideState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, OverrideState::Pending { .. })
    }

    /// Start the countdown. Returns false if already pending or applied.
    pub fn trigger(&mut self, now: Instant) -> bool {
        if self.state != OverrideState::Idle {
            return false;
        }
        self.state = OverrideState::Pending { triggered_at: now };
        true
    }

    /// True once a pending override has waited out its delay
    pub fn is_due(&self, now: Instant) -> bool {
        match self.state {
            OverrideState::Pending { triggered_at } => now.duration_since(triggered_at) >= self.delay,
            _ => false,
        }
    }

    /// Time left before a pending override is due
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.state {
            OverrideState::Pending { triggered_at } => {
                Some(self.delay.saturating_sub(now.duration_since(triggered_at)))
            }
            _ => None,
        }
    }

    /// Apply a due override. Returns `None` if nothing is due yet.
    pub fn apply(&mut self, now: Instant) -> Option<OverrideOutcome> {
        if !self.is_due(now) {
            return None;
        }
        self.state = OverrideState::Applied;
        Some(OverrideOutcome {
            stats: StatsSnapshot::OVERRIDE,
            base_liquidity: OVERRIDE_BASE_LIQUIDITY,
        })
    }

    /// Drop a pending override without applying it
    pub fn cancel(&mut self) -> bool {
        if self.is_pending() {
            self.state = OverrideState::Idle;
            return true;
        }
        false
    }
}

impl Default for OverrideController {
    fn default() -> Self {
        Self::new(DEFAULT_OVERRIDE_DELAY)
    }
}
