//! Local auto-refresh timer. At most one repeating timer task is alive at a time.
//!
//! This only paces the dashboard. Whether the server itself collects on a
//! schedule is a separate setting driven through the metrics client.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use crate::client::validate_interval;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleState {
    #[default]
    Idle,
    Active {
        interval_secs: u64,
    },
}

impl ScheduleState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn interval_secs(&self) -> Option<u64> {
        match self {
            Self::Active { interval_secs } => Some(*interval_secs),
            Self::Idle => None,
        }
    }
}

type TickFn = Arc<dyn Fn() + Send + Sync>;

pub struct RefreshScheduler {
    on_tick: TickFn,
    timer: Option<JoinHandle<()>>,
    state: ScheduleState,
}

impl RefreshScheduler {
    /// `on_tick` runs once per interval while a schedule is active.
    pub fn new<F>(on_tick: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            on_tick: Arc::new(on_tick),
            timer: None,
            state: ScheduleState::Idle,
        }
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Replace any running timer with one firing every `interval_secs` seconds.
    /// The first tick comes one full interval after the call. Must be called
    /// from within a tokio runtime.
    pub fn start(&mut self, interval_secs: u64) -> Result<()> {
        let interval_secs = validate_interval(interval_secs)?;
        // Cancel and respawn without yielding in between.
        self.cancel_timer();

        let period = Duration::from_secs(interval_secs);
        let on_tick = Arc::clone(&self.on_tick);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_tick();
            }
        }));
        self.state = ScheduleState::Active { interval_secs };
        debug!(interval_secs, "refresh timer started");
        Ok(())
    }

    /// Cancel the timer. Calling this while idle does nothing.
    pub fn stop(&mut self) {
        if self.cancel_timer() {
            debug!("refresh timer stopped");
        }
        self.state = ScheduleState::Idle;
    }

    fn cancel_timer(&mut self) -> bool {
        match self.timer.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (RefreshScheduler, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let sched = RefreshScheduler::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (sched, hits)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval() {
        let (mut s, hits) = counting();
        s.start(1).unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0, "first tick waits a full interval");
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(s.state(), ScheduleState::Active { interval_secs: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_leaves_one_timer() {
        let (mut s, hits) = counting();
        s.start(1).unwrap();
        s.start(1).unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_switches_cadence() {
        let (mut s, hits) = counting();
        s.start(1).unwrap();
        s.start(2).unwrap();
        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(s.state().interval_secs(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticks() {
        let (mut s, hits) = counting();
        s.start(1).unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        s.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(s.state(), ScheduleState::Idle);
        assert_eq!(s.state().interval_secs(), None);
    }

    #[tokio::test]
    async fn stop_when_idle_is_a_no_op() {
        let (mut s, _hits) = counting();
        s.stop();
        s.stop();
        assert!(!s.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_rejected_and_keeps_state() {
        let (mut s, hits) = counting();
        s.start(2).unwrap();
        assert!(matches!(s.start(0), Err(ClientError::InvalidInterval(0))));
        assert_eq!(s.state().interval_secs(), Some(2));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_the_timer() {
        let (mut s, hits) = counting();
        s.start(1).unwrap();
        drop(s);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
