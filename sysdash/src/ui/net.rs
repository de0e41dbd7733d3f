//! Network sparklines (download/upload) and the counters panel.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
};
use std::collections::VecDeque;

use crate::rate::NetRate;
use crate::types::MetricsSnapshot;
use crate::ui::theme::{MUTED, RECV, SENT};
use crate::ui::util::{human, human_rate};

pub fn draw_net_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: &VecDeque<u64>,
    color: Color,
) {
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();

    let spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .data(&data)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}

pub fn draw_net_totals(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: Option<&MetricsSnapshot>,
    rate: NetRate,
) {
    let block = Block::default().borders(Borders::ALL).title("Network");
    let Some(mm) = m else {
        f.render_widget(block, area);
        return;
    };
    let n = &mm.network;
    let lines = vec![
        Line::from(vec![
            Span::styled("Sent ", Style::default().fg(SENT)),
            Span::raw(format!(
                "{}  pkts {}  {}",
                human(n.bytes_sent),
                n.packets_sent,
                human_rate(rate.sent)
            )),
        ]),
        Line::from(vec![
            Span::styled("Recv ", Style::default().fg(RECV)),
            Span::raw(format!(
                "{}  pkts {}  {}",
                human(n.bytes_recv),
                n.packets_recv,
                human_rate(rate.recv)
            )),
        ]),
        Line::from(Span::styled(
            format!(
                "err in/out {}/{}  drop in/out {}/{}",
                n.err_in, n.err_out, n.drop_in, n.drop_out
            ),
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}
