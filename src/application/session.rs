//! Simulation Session
//!
//! Owns one viewing session's candle window, statistics, mode flags and RNG,
//! plus every timer that mutates them. Each timer callback locks the state,
//! re-checks that its mode is still active, computes the next value and
//! republishes the frame. Mode changes go through `reschedule`, which
//! cancels timers whose mode went inactive and spawns the ones now needed.
//!
//! Timers per mode:
//! - candle tick (1s pump / 3s synced) while not withdrawn and no external override flag
//! - statistics tick (2s) while not withdrawn, overridden or frozen
//! - candle decline (8s) and statistics decay (5s) once withdrawn
//! - one-shot override application (5s) after a forced override

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Candle, CandleWindow, ModeFlags, SimulationMode, StatsSnapshot, TickRegime};
use crate::ports::{schedule_every, schedule_once, source_from_seed, RandomSource, SeedStore, TimerHandle};
use crate::simulation::{
    crash_candle, decline_candle, stats_projector, CandleGenerator, OverrideController, SimulationConfig,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session is already running")]
    AlreadyRunning,
    #[error("Session is not running")]
    NotRunning,
    #[error("Liquidity has been withdrawn - the session no longer accepts mode changes")]
    Withdrawn,
}

/// Everything the UI renders, re-emitted after every change
///
/// Output only: `mode` is derived from `flags` and candles derive `isGreen`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFrame {
    /// Oldest first
    pub candles: Vec<Candle>,
    pub stats: StatsSnapshot,
    pub mode: SimulationMode,
    pub flags: ModeFlags,
}

struct SessionState {
    running: bool,
    flags: ModeFlags,
    window: CandleWindow,
    stats: StatsSnapshot,
    reference_price: Option<f64>,
    generator: CandleGenerator,
    override_ctl: OverrideController,
    rng: Box<dyn RandomSource>,
}

impl SessionState {
    fn frame(&self) -> SessionFrame {
        SessionFrame {
            candles: self.window.to_vec(),
            stats: self.stats,
            mode: self.flags.mode(),
            flags: self.flags,
        }
    }
}

/// State shared with timer callbacks
struct Shared {
    state: Mutex<SessionState>,
    frames: watch::Sender<SessionFrame>,
    seed_store: Arc<dyn SeedStore>,
}

impl Shared {
    fn publish(&self, state: &SessionState) {
        self.frames.send_replace(state.frame());
    }

    async fn candle_tick(&self, regime: TickRegime) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.running || state.flags.candle_regime() != Some(regime) {
            return;
        }
        let Some(previous) = state.window.last().copied() else {
            return;
        };

        let candle = state.generator.tick(
            &previous,
            regime,
            state.reference_price,
            Utc::now(),
            &mut state.rng,
        );
        state.window.push(candle);
        debug!("{:?} candle close {:.10}", regime, candle.close);
        self.publish(state);
    }

    async fn stats_tick(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.running || !state.flags.stats_ticking() {
            return;
        }

        state.stats = stats_projector::tick(&state.stats, &mut state.rng);
        debug!(
            "Stats tick: liquidity {:.2}, price {:.10}, holders {}",
            state.stats.liquidity, state.stats.price, state.stats.holders
        );
        self.publish(state);
    }

    async fn candle_decline_tick(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.running || !state.flags.liquidity_withdrawn {
            return;
        }
        let Some(previous) = state.window.last().copied() else {
            return;
        };

        let candle = decline_candle(&previous, Utc::now(), &mut state.rng);
        state.window.push(candle);
        debug!("Decline candle close {:.10}", candle.close);
        self.publish(state);
    }

    async fn stats_decline_tick(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.running || !state.flags.liquidity_withdrawn {
            return;
        }

        state.stats = stats_projector::decline(&state.stats, &mut state.rng);
        self.publish(state);
    }

    async fn apply_override(&self) {
        let outcome = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            if !state.running || state.flags.liquidity_withdrawn {
                return;
            }
            let Some(outcome) = state.override_ctl.apply(Instant::now()) else {
                return;
            };
            state.stats = outcome.stats;
            self.publish(state);
            outcome
        };

        info!(
            "Override applied - stats replaced, base liquidity now {:.2}",
            outcome.base_liquidity
        );
        if let Err(e) = self.seed_store.save_base_liquidity(outcome.base_liquidity).await {
            warn!("Failed to persist override base liquidity: {}", e);
        }
    }
}

#[derive(Default)]
struct SessionTimers {
    candle: Option<(TickRegime, TimerHandle)>,
    stats: Option<TimerHandle>,
    candle_decline: Option<TimerHandle>,
    stats_decline: Option<TimerHandle>,
    override_apply: Option<TimerHandle>,
}

/// Keep `slot` populated iff `wanted`
fn toggle(slot: &mut Option<TimerHandle>, wanted: bool, spawn: impl FnOnce() -> TimerHandle) {
    match (wanted, slot.is_some()) {
        (true, false) => *slot = Some(spawn()),
        (false, true) => *slot = None,
        _ => {}
    }
}

/// One viewing session of the market simulation
pub struct SimulationSession {
    config: SimulationConfig,
    shared: Arc<Shared>,
    timers: Mutex<SessionTimers>,
}

impl SimulationSession {
    /// Create a session drawing from the configured RNG seed (or thread RNG)
    pub fn new(config: SimulationConfig, seed_store: Arc<dyn SeedStore>) -> Self {
        let rng = source_from_seed(config.rng_seed);
        Self::with_random_source(config, seed_store, rng)
    }

    /// Create a session with an explicit random source
    pub fn with_random_source(
        config: SimulationConfig,
        seed_store: Arc<dyn SeedStore>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let state = SessionState {
            running: false,
            flags: ModeFlags::new(config.chart_independent),
            window: CandleWindow::new(),
            stats: StatsSnapshot::default(),
            reference_price: None,
            generator: CandleGenerator::default(),
            override_ctl: OverrideController::new(config.cadence.override_delay()),
            rng,
        };
        let (frames, _) = watch::channel(state.frame());

        Self {
            config,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                frames,
                seed_store,
            }),
            timers: Mutex::new(SessionTimers::default()),
        }
    }

    /// Seed candles and statistics and start ticking
    ///
    /// The liquidity seed comes from the seed store when one was persisted,
    /// otherwise from the configuration.
    pub async fn start(&self) -> Result<SessionFrame, SessionError> {
        if self.shared.state.lock().await.running {
            return Err(SessionError::AlreadyRunning);
        }

        let base_liquidity = match self.shared.seed_store.load_base_liquidity().await {
            Ok(Some(liquidity)) => {
                info!("Using persisted base liquidity {:.2}", liquidity);
                liquidity
            }
            Ok(None) => self.config.initial_liquidity,
            Err(e) => {
                warn!("Failed to load base liquidity, using configured seed: {}", e);
                self.config.initial_liquidity
            }
        };

        let frame = {
            let mut guard = self.shared.state.lock().await;
            let state = &mut *guard;
            if state.running {
                return Err(SessionError::AlreadyRunning);
            }

            state.flags = ModeFlags::new(self.config.chart_independent);
            state.override_ctl = OverrideController::new(self.config.cadence.override_delay());
            state.stats = stats_projector::seed(base_liquidity, &mut state.rng);
            let candles = state
                .generator
                .initialize(self.config.initial_price, Utc::now(), &mut state.rng);
            if candles.is_empty() {
                warn!(
                    "Seed price {} is not positive - chart starts empty",
                    self.config.initial_price
                );
            }
            state.window.reset(candles);
            state.running = true;

            info!(
                "Simulation session started - {}, liquidity {:.2}, price {:.10}",
                state.flags.mode().description(),
                state.stats.liquidity,
                state.stats.price
            );
            self.shared.publish(state);
            state.frame()
        };

        self.reschedule().await;
        Ok(frame)
    }

    /// Stop ticking and cancel every timer
    pub async fn stop(&self) {
        let mut timers = self.timers.lock().await;
        {
            let mut state = self.shared.state.lock().await;
            if !state.running {
                return;
            }
            state.running = false;
            state.override_ctl.cancel();
            self.shared.publish(&state);
        }
        *timers = SessionTimers::default();
        info!("Simulation session stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.shared.state.lock().await.running
    }

    /// Current frame
    pub async fn frame(&self) -> SessionFrame {
        self.shared.state.lock().await.frame()
    }

    pub async fn mode(&self) -> SimulationMode {
        self.shared.state.lock().await.flags.mode()
    }

    /// Receive every frame the session emits
    pub fn subscribe(&self) -> watch::Receiver<SessionFrame> {
        self.shared.frames.subscribe()
    }

    /// Switch between the independent pump and synced regimes
    pub async fn set_chart_independent(&self, independent: bool) -> Result<(), SessionError> {
        self.update_flags(|flags| flags.chart_independent = independent).await
    }

    /// External override flag - pauses candle ticking
    pub async fn set_override_mode(&self, enabled: bool) -> Result<(), SessionError> {
        self.update_flags(|flags| flags.override_mode = enabled).await
    }

    /// Freeze statistics without touching candles
    pub async fn set_frozen(&self, frozen: bool) -> Result<(), SessionError> {
        self.update_flags(|flags| flags.frozen_values = frozen).await
    }

    /// Price synced candles follow; `None` falls back to the last close
    pub async fn set_reference_price(&self, price: Option<f64>) {
        self.shared.state.lock().await.reference_price = price;
    }

    /// Rebuild the candle history from a new seed price
    pub async fn reset_chart(&self, seed_price: f64) -> Result<(), SessionError> {
        let mut guard = self.shared.state.lock().await;
        let state = &mut *guard;
        Self::ensure_live(state)?;

        let candles = state.generator.initialize(seed_price, Utc::now(), &mut state.rng);
        state.window.reset(candles);
        info!("Chart restarted from seed price {}", seed_price);
        self.shared.publish(state);
        Ok(())
    }

    /// Pull liquidity: crash now, then decline forever
    ///
    /// Cancels normal ticking and any pending override. Calling it again is a no-op.
    pub async fn withdraw_liquidity(&self) -> Result<(), SessionError> {
        {
            let mut guard = self.shared.state.lock().await;
            let state = &mut *guard;
            if !state.running {
                return Err(SessionError::NotRunning);
            }
            if !state.flags.withdraw() {
                debug!("Liquidity already withdrawn");
                return Ok(());
            }

            if let Some(previous) = state.window.last().copied() {
                state.window.push(crash_candle(&previous, Utc::now()));
            }
            state.stats = stats_projector::crash(&state.stats);
            if state.override_ctl.cancel() {
                info!("Pending override dropped - liquidity withdrawn");
            }

            warn!(
                "{} - price {:.10}, holders {}",
                state.flags.mode().description(),
                state.stats.price,
                state.stats.holders
            );
            self.shared.publish(state);
        }

        self.reschedule().await;
        Ok(())
    }

    /// Freeze statistics now and replace them with the override literals
    /// once the override delay has passed
    ///
    /// Candles keep ticking. Triggering again while pending is a no-op.
    pub async fn force_override(&self) -> Result<(), SessionError> {
        {
            let mut guard = self.shared.state.lock().await;
            let state = &mut *guard;
            Self::ensure_live(state)?;

            let now = Instant::now();
            if !state.override_ctl.trigger(now) {
                match state.override_ctl.remaining(now) {
                    Some(left) => debug!("Override already pending - due in {:?}", left),
                    None => debug!("Override already applied"),
                }
                return Ok(());
            }
            state.flags.overridden = true;
            info!(
                "Override triggered - statistics frozen, replacement in {:?}",
                state.override_ctl.delay()
            );
            self.shared.publish(state);
        }

        self.reschedule().await;
        Ok(())
    }

    fn ensure_live(state: &SessionState) -> Result<(), SessionError> {
        if !state.running {
            return Err(SessionError::NotRunning);
        }
        if state.flags.liquidity_withdrawn {
            return Err(SessionError::Withdrawn);
        }
        Ok(())
    }

    async fn update_flags(&self, update: impl FnOnce(&mut ModeFlags)) -> Result<(), SessionError> {
        {
            let mut state = self.shared.state.lock().await;
            Self::ensure_live(&state)?;

            let before = state.flags;
            update(&mut state.flags);
            if state.flags == before {
                return Ok(());
            }
            info!("Mode flags changed - {}", state.flags.mode().description());
            self.shared.publish(&state);
        }

        self.reschedule().await;
        Ok(())
    }

    /// Bring the running timers in line with the current flags
    ///
    /// Lock order is timers then state, so a reschedule never acts on flags
    /// that a later command has already changed.
    async fn reschedule(&self) {
        let mut timers = self.timers.lock().await;
        let (running, flags, override_pending) = {
            let state = self.shared.state.lock().await;
            (state.running, state.flags, state.override_ctl.is_pending())
        };
        let cadence = &self.config.cadence;

        let regime = if running { flags.candle_regime() } else { None };
        if timers.candle.as_ref().map(|(r, _)| *r) != regime {
            timers.candle = regime.map(|r| {
                let shared = self.shared.clone();
                let handle = schedule_every("candle", cadence.candle_period(r), move || {
                    let shared = shared.clone();
                    async move { shared.candle_tick(r).await }
                });
                (r, handle)
            });
        }

        toggle(&mut timers.stats, running && flags.stats_ticking(), || {
            let shared = self.shared.clone();
            schedule_every("stats", cadence.stats_period(), move || {
                let shared = shared.clone();
                async move { shared.stats_tick().await }
            })
        });

        let withdrawn = running && flags.liquidity_withdrawn;
        toggle(&mut timers.candle_decline, withdrawn, || {
            let shared = self.shared.clone();
            schedule_every("candle decline", cadence.candle_decline_period(), move || {
                let shared = shared.clone();
                async move { shared.candle_decline_tick().await }
            })
        });
        toggle(&mut timers.stats_decline, withdrawn, || {
            let shared = self.shared.clone();
            schedule_every("stats decline", cadence.stats_decline_period(), move || {
                let shared = shared.clone();
                async move { shared.stats_decline_tick().await }
            })
        });

        let override_wanted = running && override_pending && !flags.liquidity_withdrawn;
        toggle(&mut timers.override_apply, override_wanted, || {
            let shared = self.shared.clone();
            schedule_once("override", cadence.override_delay(), move || async move {
                shared.apply_override().await
            })
        });
    }
}
