//! Presentation: the `Presenter` seam the controller talks to, and the ratatui
//! dashboard that implements it.

pub mod alerts;
pub mod charts;
pub mod cpu;
pub mod dashboard;
pub mod disks;
pub mod header;
pub mod mem;
pub mod net;
pub mod processes;
pub mod swap;
pub mod theme;
pub mod util;

use crate::alerts::Alert;
use crate::history::HistoryView;
use crate::rate::NetRate;
use crate::scheduler::ScheduleState;
use crate::types::MetricsSnapshot;

pub use dashboard::Dashboard;

/// User-visible outcome of the last operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success(String),
    Info(String),
    Error(String),
}

/// Consumer of everything the controller derives from the API.
pub trait Presenter {
    /// A newly accepted snapshot and the network rate derived from it.
    fn show_snapshot(&mut self, snapshot: &MetricsSnapshot, net: NetRate);

    /// Window-filtered history with rates aligned to its entries.
    fn show_history(&mut self, view: HistoryView);

    fn show_status(&mut self, status: Status);

    /// The recent alert log, oldest first. Sent whenever a check raises something.
    fn show_alerts(&mut self, _alerts: &[Alert]) {}

    fn show_schedule(&mut self, _state: ScheduleState) {}

    /// Whether history charts are on screen; loaded history is only refreshed then.
    fn history_visible(&self) -> bool {
        true
    }
}
