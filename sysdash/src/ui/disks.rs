//! Disk cards: one gauge per mount point.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};
use crate::types::MetricsSnapshot;
use crate::ui::util::{gauge_pct, human, level_color, truncate_middle};

pub fn draw_disks(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Disks"), area);
    let Some(mm) = m else { return; };

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height == 0 { return; }
    if mm.disk.is_empty() {
        f.render_widget(
            Paragraph::new(Line::from("No disk information available")).centered(),
            inner,
        );
        return;
    }
    if inner.height < 3 { return; }

    let per_disk_h = 3u16;
    let max_cards = (inner.height / per_disk_h).min(mm.disk.len() as u16) as usize;

    let constraints: Vec<Constraint> = (0..max_cards)
        .map(|_| Constraint::Length(per_disk_h))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (slot, (mount, d)) in rows.iter().zip(mm.disk.iter()) {
        let title = format!(
            "{}   {} / {}  free {}  ({:.1}%)",
            truncate_middle(mount, (slot.width.saturating_sub(6)) as usize / 2),
            human(d.used),
            human(d.total),
            human(d.free),
            d.percent
        );

        let card = Block::default().borders(Borders::ALL).title(title);
        f.render_widget(card, *slot);

        let inner_card = Rect {
            x: slot.x + 1,
            y: slot.y + 1,
            width: slot.width.saturating_sub(2),
            height: slot.height.saturating_sub(2),
        };
        if inner_card.height == 0 { continue; }

        let g = Gauge::default()
            .percent(gauge_pct(d.percent))
            .gauge_style(Style::default().fg(level_color(d.percent)));
        f.render_widget(g, inner_card);
    }
}
