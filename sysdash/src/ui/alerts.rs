//! Alert log panel, newest first.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::alerts::Alert;
use crate::ui::theme::MUTED;

pub fn draw_alert_log(f: &mut ratatui::Frame<'_>, area: Rect, alerts: &[Alert]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Alert log ({})", alerts.len()));
    if alerts.is_empty() {
        let msg = Paragraph::new(Line::from("No alerts raised"))
            .centered()
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = alerts
        .iter()
        .rev()
        .take(visible)
        .map(|a| {
            Line::from(vec![
                Span::styled(
                    a.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(MUTED),
                ),
                Span::styled(a.message.clone(), Style::default().fg(Color::Yellow)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}
