//! History handling: time-window filtering of server history, interval rates
//! for the charts, and small bounded buffers for live sparklines.

use std::collections::VecDeque;

use chrono::{Duration, NaiveDateTime};

use crate::rate::{counter_rate, CounterSample, NetRate};
use crate::types::MetricsSnapshot;

/// Entries no older than `window` relative to `now`, in their original order.
pub fn filter_window(
    series: &[MetricsSnapshot],
    window: Duration,
    now: NaiveDateTime,
) -> Vec<MetricsSnapshot> {
    series
        .iter()
        .filter(|entry| now - entry.timestamp <= window)
        .cloned()
        .collect()
}

/// One rate per entry; the first entry has no predecessor and gets zero.
pub fn compute_interval_rates(series: &[MetricsSnapshot]) -> Vec<NetRate> {
    let mut rates = Vec::with_capacity(series.len());
    if series.is_empty() {
        return rates;
    }
    rates.push(NetRate::ZERO);
    rates.extend(series.windows(2).map(|pair| {
        let prev = CounterSample::from(&pair[0]);
        let cur = CounterSample::from(&pair[1]);
        counter_rate(&prev, &cur)
    }));
    rates
}

/// Chart window choices, in hours.
pub const TIME_RANGES_HOURS: [u32; 5] = [1, 3, 6, 12, 24];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    hours: u32,
}

impl TimeRange {
    /// Any positive hour count; zero is bumped to one hour.
    pub fn hours(hours: u32) -> Self {
        Self {
            hours: hours.max(1),
        }
    }

    pub fn as_hours(&self) -> u32 {
        self.hours
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(i64::from(self.hours))
    }

    /// Next preset larger than the current one, wrapping to the smallest.
    pub fn next(&self) -> Self {
        let next = TIME_RANGES_HOURS
            .iter()
            .copied()
            .find(|&h| h > self.hours)
            .unwrap_or(TIME_RANGES_HOURS[0]);
        Self::hours(next)
    }

    pub fn label(&self) -> String {
        if self.hours == 1 {
            "1 hour".into()
        } else {
            format!("{} hours", self.hours)
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::hours(1)
    }
}

/// Filtered history plus rates aligned 1:1 with it, ready for the charts.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub range: TimeRange,
    pub entries: Vec<MetricsSnapshot>,
    pub rates: Vec<NetRate>,
}

impl HistoryView {
    pub fn build(series: &[MetricsSnapshot], range: TimeRange, now: NaiveDateTime) -> Self {
        let entries = filter_window(series, range.duration(), now);
        let rates = compute_interval_rates(&entries);
        Self {
            range,
            entries,
            rates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

// Keeps a history deque per core with a fixed capacity
pub struct PerCoreHistory {
    pub deques: Vec<VecDeque<u16>>,
    cap: usize,
}

impl PerCoreHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            deques: Vec::new(),
            cap,
        }
    }

    // One deque per core; reset when the core count changes
    pub fn ensure_cores(&mut self, n: usize) {
        if self.deques.len() == n {
            return;
        }
        self.deques = (0..n).map(|_| VecDeque::with_capacity(self.cap)).collect();
    }

    // Values are percentages, clamped into 0..=100
    pub fn push_samples(&mut self, samples: &[f64]) {
        self.ensure_cores(samples.len());
        for (i, v) in samples.iter().enumerate() {
            let val = v.clamp(0.0, 100.0).round() as u16;
            push_capped(&mut self.deques[i], val, self.cap);
        }
    }
}
