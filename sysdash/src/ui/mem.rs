//! Memory gauge.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};
use crate::types::MetricsSnapshot;
use crate::ui::util::{gauge_pct, gib, level_color};

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let (label, pct) = match m {
        Some(mm) => (
            format!(
                "{} / {}  (free {})",
                gib(mm.memory.used),
                gib(mm.memory.total),
                gib(mm.memory.free)
            ),
            mm.memory.percent,
        ),
        None => (String::new(), 0.0),
    };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Memory {pct:.1}%")))
        .gauge_style(Style::default().fg(level_color(pct)))
        .percent(gauge_pct(pct))
        .label(label);
    f.render_widget(g, area);
}
