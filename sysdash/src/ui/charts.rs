//! History charts: CPU, memory/swap and network throughput over the selected window.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::history::HistoryView;
use crate::ui::theme::{CPU, MEM, MUTED, RECV, SENT, SWAP};

type Points = Vec<(f64, f64)>;

/// Seconds since the first entry, one x value per entry.
fn x_offsets(view: &HistoryView) -> Vec<f64> {
    let Some(first) = view.entries.first() else {
        return Vec::new();
    };
    view.entries
        .iter()
        .map(|e| (e.timestamp - first.timestamp).num_seconds() as f64)
        .collect()
}

fn x_axis(view: &HistoryView, xs: &[f64]) -> Axis<'static> {
    let max_x = xs.last().copied().unwrap_or(0.0).max(1.0);
    let fmt = |i: usize| {
        view.entries
            .get(i)
            .map(|e| e.timestamp.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    };
    Axis::default()
        .style(Style::default().fg(MUTED))
        .bounds([0.0, max_x])
        .labels(vec![
            Span::raw(fmt(0)),
            Span::raw(fmt(view.entries.len().saturating_sub(1))),
        ])
}

fn series(xs: &[f64], ys: impl Iterator<Item = f64>) -> Points {
    xs.iter().copied().zip(ys).collect()
}

pub fn draw_history(f: &mut ratatui::Frame<'_>, area: Rect, view: Option<&HistoryView>) {
    let Some(view) = view.filter(|v| !v.is_empty()) else {
        let block = Block::default().borders(Borders::ALL).title("History");
        let msg = Paragraph::new(Line::from("No historical data loaded (press h)"))
            .centered()
            .block(block);
        f.render_widget(msg, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let xs = x_offsets(view);
    let span = view.range.label();

    let cpu: Points = series(&xs, view.entries.iter().map(|e| e.cpu.average_percent));
    let ram: Points = series(&xs, view.entries.iter().map(|e| e.memory.percent));
    let swap: Points = series(&xs, view.entries.iter().map(|e| e.memory.swap.percent));
    let sent_kb: Points = series(&xs, view.rates.iter().map(|r| r.sent / 1024.0));
    let recv_kb: Points = series(&xs, view.rates.iter().map(|r| r.recv / 1024.0));

    let pct_axis = || {
        Axis::default()
            .style(Style::default().fg(MUTED))
            .bounds([0.0, 100.0])
            .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")])
    };

    let cpu_chart = Chart::new(vec![Dataset::default()
        .name("CPU %")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(CPU))
        .data(&cpu)])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("CPU usage — last {span} ({} samples)", view.entries.len())),
    )
    .x_axis(x_axis(view, &xs))
    .y_axis(pct_axis());
    f.render_widget(cpu_chart, rows[0]);

    let mem_chart = Chart::new(vec![
        Dataset::default()
            .name("RAM %")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(MEM))
            .data(&ram),
        Dataset::default()
            .name("Swap %")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(SWAP))
            .data(&swap),
    ])
    .block(Block::default().borders(Borders::ALL).title("Memory usage"))
    .x_axis(x_axis(view, &xs))
    .y_axis(pct_axis());
    f.render_widget(mem_chart, rows[1]);

    let peak = sent_kb
        .iter()
        .chain(recv_kb.iter())
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let net_chart = Chart::new(vec![
        Dataset::default()
            .name("Sent KB/s")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(SENT))
            .data(&sent_kb),
        Dataset::default()
            .name("Recv KB/s")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(RECV))
            .data(&recv_kb),
    ])
    .block(Block::default().borders(Borders::ALL).title("Network throughput"))
    .x_axis(x_axis(view, &xs))
    .y_axis(
        Axis::default()
            .style(Style::default().fg(MUTED))
            .bounds([0.0, peak])
            .labels(vec![Span::raw("0"), Span::raw(format!("{peak:.1}"))]),
    );
    f.render_widget(net_chart, rows[2]);
}
