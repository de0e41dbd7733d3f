//! Swap gauge.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};
use crate::types::MetricsSnapshot;
use crate::ui::util::{gauge_pct, gib, level_color};

pub fn draw_swap(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let Some(swap) = m.map(|mm| &mm.memory.swap) else {
        f.render_widget(Block::default().borders(Borders::ALL).title("Swap"), area);
        return;
    };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Swap {:.1}%", swap.percent)))
        .gauge_style(Style::default().fg(level_color(swap.percent)))
        .percent(gauge_pct(swap.percent))
        .label(format!("{} / {}  (free {})", gib(swap.used), gib(swap.total), gib(swap.free)));
    f.render_widget(g, area);
}
