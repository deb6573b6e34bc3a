//! Timer scheduling port
//!
//! `schedule_every` and `schedule_once` spawn tokio tasks and hand back a
//! `TimerHandle`. Dropping the handle aborts the task, so a timer lives
//! exactly as long as whoever owns its handle.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Owned cancellation handle for a scheduled timer
#[derive(Debug)]
pub struct TimerHandle {
    label: &'static str,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// True once a one-shot timer has fired or the task was aborted
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the timer now
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            debug!("Cancelling {} timer", self.label);
        }
        self.task.abort();
    }
}

/// Run `tick` every `period`, first firing one full period from now
///
/// Must be called from within a tokio runtime. `period` must be non-zero.
pub fn schedule_every<F, Fut>(label: &'static str, period: Duration, mut tick: F) -> TimerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let start = Instant::now() + period;
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            tick().await;
        }
    });
    debug!("Scheduled {} timer every {:?}", label, period);
    TimerHandle { label, task }
}

/// Run `action` once after `delay`
pub fn schedule_once<F, Fut>(label: &'static str, delay: Duration, action: F) -> TimerHandle
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let deadline = Instant::now() + delay;
    let task = tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        action().await;
    });
    debug!("Scheduled {} timer in {:?}", label, delay);
    TimerHandle { label, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counter_tick(counter: &Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<()> + Send + 'static {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_fires_on_period() {
        let counter = Arc::new(AtomicU32::new(0));
        let handle = schedule_every("test", Duration::from_millis(1000), counter_tick(&counter));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(handle.label(), "test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let counter = Arc::new(AtomicU32::new(0));
        let handle = schedule_every("test", Duration::from_millis(500), counter_tick(&counter));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let handle = schedule_once("once", Duration::from_millis(5000), move || async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_cancelled_never_fires() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let handle = schedule_once("once", Duration::from_millis(100), move || async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(handle);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
