//! Top header (host overview, schedule) and the status/alert line under it.

use chrono::NaiveDateTime;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::alerts::Alert;
use crate::scheduler::ScheduleState;
use crate::types::MetricsSnapshot;
use crate::ui::theme::MUTED;
use crate::ui::util::format_uptime;
use crate::ui::Status;

pub const KEY_HELP: &str =
    "q quit · r refresh · c collect · a auto · i interval · x stop · h history · l alerts · t range · p sort";

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: Option<&MetricsSnapshot>,
    schedule: ScheduleState,
    last_update: Option<NaiveDateTime>,
) {
    let auto = match schedule.interval_secs() {
        Some(s) => format!("auto: every {s}s"),
        None => "auto: off".into(),
    };
    let updated = last_update
        .map(|t| format!("updated {}", t.format("%H:%M:%S")))
        .unwrap_or_else(|| "no data yet".into());
    let title = if let Some(mm) = m {
        format!(
            "sysdash — up {} | {} cores @ {:.2} GHz | load {:.2} {:.2} {:.2} | {auto} | {updated}",
            format_uptime(&mm.system.uptime),
            mm.cpu.count,
            mm.cpu.frequency.current / 1000.0,
            mm.load_average.one,
            mm.load_average.five,
            mm.load_average.fifteen,
        )
    } else {
        format!("sysdash — connecting... | {auto}  ({KEY_HELP})")
    };
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, status: &Status, alerts: &[Alert]) {
    let (text, color) = match status {
        Status::Idle => (KEY_HELP.to_string(), MUTED),
        Status::Loading => ("Loading system metrics...".to_string(), Color::Cyan),
        Status::Success(msg) => (msg.clone(), Color::Green),
        Status::Info(msg) => (msg.clone(), Color::Blue),
        Status::Error(msg) => (msg.clone(), Color::Red),
    };
    let mut spans = vec![Span::styled(text, Style::default().fg(color))];
    if let Some(latest) = alerts.last() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("⚠ {} ({} in log, l to view)", latest.message, alerts.len()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
