//! Network rate derivation from cumulative counters.
//!
//! Counters only grow until the source restarts; a drop is treated as a reset
//! and yields zero instead of a negative rate. Rates are bytes per second,
//! normalized by the gap between the two samples' timestamps, so the live
//! poll path and the history charts agree.

use chrono::NaiveDateTime;

use crate::types::MetricsSnapshot;

/// Sent/received throughput in bytes per second (or a raw byte delta).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetRate {
    pub sent: f64,
    pub recv: f64,
}

impl NetRate {
    pub const ZERO: NetRate = NetRate { sent: 0.0, recv: 0.0 };
}

/// The counters a rate is derived from, with the time they were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    pub sent: u64,
    pub recv: u64,
    pub at: NaiveDateTime,
}

impl From<&MetricsSnapshot> for CounterSample {
    fn from(s: &MetricsSnapshot) -> Self {
        Self {
            sent: s.network.bytes_sent,
            recv: s.network.bytes_recv,
            at: s.timestamp,
        }
    }
}

/// Clamped byte difference between two samples.
pub fn counter_delta(prev: &CounterSample, cur: &CounterSample) -> NetRate {
    NetRate {
        sent: cur.sent.saturating_sub(prev.sent) as f64,
        recv: cur.recv.saturating_sub(prev.recv) as f64,
    }
}

/// Bytes per second between two samples; zero when the clock did not move forward.
pub fn counter_rate(prev: &CounterSample, cur: &CounterSample) -> NetRate {
    let elapsed = (cur.at - prev.at).num_milliseconds() as f64 / 1000.0;
    if elapsed <= 0.0 {
        return NetRate::ZERO;
    }
    let d = counter_delta(prev, cur);
    NetRate {
        sent: d.sent / elapsed,
        recv: d.recv / elapsed,
    }
}

/// Remembers the last counters seen on the live path.
#[derive(Debug, Default)]
pub struct RateTracker {
    last: Option<CounterSample>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&CounterSample> {
        self.last.as_ref()
    }

    /// Raw per-poll difference against the stored sample; zero before the first update.
    pub fn compute_delta(&self, current: &CounterSample) -> NetRate {
        match &self.last {
            Some(prev) => counter_delta(prev, current),
            None => NetRate::ZERO,
        }
    }

    /// Time-normalized rate against the stored sample; zero before the first update.
    pub fn compute_rate(&self, current: &CounterSample) -> NetRate {
        match &self.last {
            Some(prev) => counter_rate(prev, current),
            None => NetRate::ZERO,
        }
    }

    pub fn update(&mut self, current: CounterSample) {
        self.last = Some(current);
    }

    /// Rate for `current`, then remember it. Must run once per accepted snapshot.
    pub fn observe(&mut self, current: CounterSample) -> NetRate {
        let rate = self.compute_rate(&current);
        self.update(current);
        rate
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
