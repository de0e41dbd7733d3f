//! Terminal dashboard: keeps what the controller handed over and draws it.

use std::collections::VecDeque;

use chrono::{Local, NaiveDateTime};
use ratatui::layout::{Constraint, Direction, Layout};

use crate::alerts::Alert;
use crate::history::{push_capped, HistoryView, PerCoreHistory};
use crate::rate::NetRate;
use crate::scheduler::ScheduleState;
use crate::types::MetricsSnapshot;
use crate::ui::alerts::draw_alert_log;
use crate::ui::charts::draw_history;
use crate::ui::cpu::{draw_cpu_avg_graph, draw_per_core_bars};
use crate::ui::disks::draw_disks;
use crate::ui::header::{draw_header, draw_status};
use crate::ui::mem::draw_mem;
use crate::ui::net::{draw_net_spark, draw_net_totals};
use crate::ui::processes::{draw_top_processes, ProcSortBy};
use crate::ui::swap::draw_swap;
use crate::ui::theme::{RECV, SENT};
use crate::ui::{Presenter, Status};

const HIST_CAP: usize = 600;

/// Which panel set fills the lower half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Live,
    History,
    Alerts,
}

pub struct Dashboard {
    last: Option<MetricsSnapshot>,
    last_update: Option<NaiveDateTime>,
    net_rate: NetRate,

    // CPU avg history (0..100)
    cpu_hist: VecDeque<u64>,
    per_core_hist: PerCoreHistory,

    // KB/s histories for the sparklines
    rx_hist: VecDeque<u64>,
    tx_hist: VecDeque<u64>,
    rx_peak: u64,
    tx_peak: u64,

    history: Option<HistoryView>,
    status: Status,
    alerts: Vec<Alert>,
    schedule: ScheduleState,

    pub view: View,
    pub procs_sort_by: ProcSortBy,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            last: None,
            last_update: None,
            net_rate: NetRate::ZERO,
            cpu_hist: VecDeque::with_capacity(HIST_CAP),
            per_core_hist: PerCoreHistory::new(60),
            rx_hist: VecDeque::with_capacity(HIST_CAP),
            tx_hist: VecDeque::with_capacity(HIST_CAP),
            rx_peak: 0,
            tx_peak: 0,
            history: None,
            status: Status::Idle,
            alerts: Vec::new(),
            schedule: ScheduleState::Idle,
            view: View::Live,
            procs_sort_by: ProcSortBy::CpuDesc,
        }
    }

    /// Switch the lower panel to `target`, or back to the live panels if it is already showing.
    pub fn toggle_view(&mut self, target: View) {
        self.view = if self.view == target {
            View::Live
        } else {
            target
        };
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, status, top (cpu avg + per-core), memory, swap, bottom
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),   // header
                Constraint::Length(1),   // status / alerts
                Constraint::Ratio(1, 3), // top row
                Constraint::Length(3),   // memory (left) + network counters (right)
                Constraint::Length(3),   // swap (left)
                Constraint::Min(10),     // bottom: live panels or history charts
            ])
            .split(area);

        let m = self.last.as_ref();
        draw_header(f, rows[0], m, self.schedule, self.last_update);
        draw_status(f, rows[1], &self.status, &self.alerts);

        let top_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[2]);
        draw_cpu_avg_graph(f, top_lr[0], &self.cpu_hist, m);
        draw_per_core_bars(f, top_lr[1], m, &self.per_core_hist);

        let mem_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[3]);
        let swap_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[4]);
        draw_mem(f, mem_lr[0], m);
        draw_swap(f, swap_lr[0], m);

        // Network counters span the memory + swap rows on the right
        let net_area = ratatui::layout::Rect {
            x: mem_lr[1].x,
            y: mem_lr[1].y,
            width: mem_lr[1].width,
            height: mem_lr[1].height + swap_lr[1].height,
        };
        draw_net_totals(f, net_area, m, self.net_rate);

        let bottom_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[5]);

        match self.view {
            View::Live => {
                let left_stack = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Min(4),
                        Constraint::Length(5),
                        Constraint::Length(5),
                    ])
                    .split(bottom_lr[0]);
                draw_disks(f, left_stack[0], m);
                draw_net_spark(
                    f,
                    left_stack[1],
                    &format!(
                        "Download (KB/s) — now: {} | peak: {}",
                        self.rx_hist.back().copied().unwrap_or(0),
                        self.rx_peak
                    ),
                    &self.rx_hist,
                    RECV,
                );
                draw_net_spark(
                    f,
                    left_stack[2],
                    &format!(
                        "Upload (KB/s) — now: {} | peak: {}",
                        self.tx_hist.back().copied().unwrap_or(0),
                        self.tx_peak
                    ),
                    &self.tx_hist,
                    SENT,
                );
            }
            View::History => draw_history(f, bottom_lr[0], self.history.as_ref()),
            View::Alerts => draw_alert_log(f, bottom_lr[0], &self.alerts),
        }

        draw_top_processes(f, bottom_lr[1], m, self.procs_sort_by);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for Dashboard {
    fn show_snapshot(&mut self, m: &MetricsSnapshot, net: NetRate) {
        let v = m.cpu.average_percent.clamp(0.0, 100.0).round() as u64;
        push_capped(&mut self.cpu_hist, v, HIST_CAP);
        self.per_core_hist.push_samples(&m.cpu.per_core_percent);

        let rx_kb = (net.recv / 1024.0).round() as u64;
        let tx_kb = (net.sent / 1024.0).round() as u64;
        push_capped(&mut self.rx_hist, rx_kb, HIST_CAP);
        push_capped(&mut self.tx_hist, tx_kb, HIST_CAP);
        self.rx_peak = self.rx_peak.max(rx_kb);
        self.tx_peak = self.tx_peak.max(tx_kb);

        self.net_rate = net;
        self.last = Some(m.clone());
        self.last_update = Some(Local::now().naive_local());
    }

    fn show_history(&mut self, view: HistoryView) {
        self.history = Some(view);
    }

    fn show_status(&mut self, status: Status) {
        self.status = status;
    }

    fn show_alerts(&mut self, alerts: &[Alert]) {
        self.alerts = alerts.to_vec();
    }

    fn show_schedule(&mut self, state: ScheduleState) {
        self.schedule = state;
    }

    fn history_visible(&self) -> bool {
        self.view == View::History
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::TimeRange;
    use crate::types::fixtures::{sample_at, snapshot};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(d: &mut Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| d.draw(f)).unwrap();
        let buf = terminal.backend().buffer();
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_before_any_data() {
        let mut d = Dashboard::new();
        let text = render(&mut d);
        assert!(text.contains("connecting"));
    }

    #[test]
    fn renders_live_snapshot() {
        let mut d = Dashboard::new();
        d.show_snapshot(&snapshot(), NetRate { sent: 2048.0, recv: 0.0 });
        d.show_schedule(ScheduleState::Active { interval_secs: 5 });
        let text = render(&mut d);
        assert!(text.contains("auto: every 5s"));
        assert!(text.contains("/boot"));
        assert!(text.contains("worker"));
        assert_eq!(d.tx_hist.back(), Some(&2));
    }

    #[test]
    fn renders_history_view() {
        let mut d = Dashboard::new();
        d.show_snapshot(&snapshot(), NetRate::ZERO);
        let series = vec![
            sample_at("2024-03-01 11:59:00", 0, 0),
            sample_at("2024-03-01 12:00:00", 60_000, 0),
        ];
        let now = series[1].timestamp;
        d.show_history(HistoryView::build(&series, TimeRange::default(), now));
        d.toggle_view(View::History);
        assert!(d.history_visible());
        let text = render(&mut d);
        assert!(text.contains("Network throughput"));
        d.toggle_view(View::History);
        assert_eq!(d.view, View::Live);
    }

    #[test]
    fn renders_alert_log() {
        let mut d = Dashboard::new();
        let mut ev = crate::alerts::AlertEvaluator::new(Default::default());
        let raised = ev.check(&snapshot());
        assert!(!raised.is_empty());
        d.show_alerts(&ev.recent(crate::alerts::DEFAULT_RECENT_LIMIT));
        d.toggle_view(View::Alerts);
        assert!(!d.history_visible());
        let text = render(&mut d);
        assert!(text.contains("Alert log (1)"), "{text}");
        assert!(text.contains("/boot"));
    }
}
