//! CPU average sparkline + per-core mini bars.

use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
};
use std::collections::VecDeque;

use crate::history::PerCoreHistory;
use crate::types::MetricsSnapshot;
use crate::ui::theme::CPU;
use crate::ui::util::level_color;

pub fn draw_cpu_avg_graph(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    hist: &VecDeque<u64>,
    m: Option<&MetricsSnapshot>,
) {
    let title = match m {
        Some(mm) => format!(
            "CPU avg (now: {:>5.1}%) — {} cores @ {:.2} GHz",
            mm.cpu.average_percent,
            mm.cpu.count,
            mm.cpu.frequency.current / 1000.0
        ),
        None => "CPU avg".into(),
    };
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(CPU));
    f.render_widget(spark, area);
}

pub fn draw_per_core_bars(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: Option<&MetricsSnapshot>,
    per_core_hist: &PerCoreHistory,
) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Per-core"), area);
    let Some(mm) = m else { return; };

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height == 0 { return; }

    let cores = &mm.cpu.per_core_percent;
    let show_n = (inner.height as usize).min(cores.len());
    let constraints: Vec<Constraint> = (0..show_n).map(|_| Constraint::Length(1)).collect();
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, rect) in vchunks.iter().enumerate() {
        let hchunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(6), Constraint::Length(13)])
            .split(*rect);

        let curr = cores[i].clamp(0.0, 100.0);
        // Trend against the sample ~10 polls back
        let older = per_core_hist
            .deques
            .get(i)
            .and_then(|d| d.iter().rev().nth(10).copied())
            .map(f64::from)
            .unwrap_or(curr);
        let trend = if curr > older + 0.2 {
            "↑"
        } else if curr + 0.2 < older {
            "↓"
        } else {
            "╌"
        };
        let fg = level_color(curr);

        let hist: Vec<u64> = per_core_hist
            .deques
            .get(i)
            .map(|d| {
                let max_points = hchunks[0].width as usize;
                let start = d.len().saturating_sub(max_points);
                d.iter().skip(start).map(|&v| u64::from(v)).collect()
            })
            .unwrap_or_default();

        let spark = Sparkline::default()
            .data(&hist)
            .max(100)
            .style(Style::default().fg(fg));
        f.render_widget(spark, hchunks[0]);

        let label = format!("core{:<2}{}{:>5.1}%", i + 1, trend, curr);
        let line = Line::from(Span::styled(
            label,
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(line).right_aligned(), hchunks[1]);
    }
}
