//! Top processes table with per-cell coloring and sorting.

use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};
use std::cmp::Ordering;

use crate::types::{MetricsSnapshot, ProcessInfo};
use crate::ui::theme::MUTED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcSortBy {
    #[default]
    CpuDesc,
    MemDesc,
}

impl ProcSortBy {
    pub fn toggle(self) -> Self {
        match self {
            Self::CpuDesc => Self::MemDesc,
            Self::MemDesc => Self::CpuDesc,
        }
    }
}

const COLS: [Constraint; 5] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(40), // Name
    Constraint::Length(12),     // User
    Constraint::Length(8),      // CPU %
    Constraint::Length(8),      // Mem %
];

/// Indices into `procs`, highest first; missing percentages sort as zero.
pub fn sorted_indices(procs: &[ProcessInfo], sort_by: ProcSortBy) -> Vec<usize> {
    let key = |p: &ProcessInfo| match sort_by {
        ProcSortBy::CpuDesc => p.cpu_percent.unwrap_or(0.0),
        ProcSortBy::MemDesc => p.memory_percent.unwrap_or(0.0),
    };
    let mut idxs: Vec<usize> = (0..procs.len()).collect();
    idxs.sort_by(|&a, &b| {
        key(&procs[b])
            .partial_cmp(&key(&procs[a]))
            .unwrap_or(Ordering::Equal)
    });
    idxs
}

fn fmt_pct(v: Option<f64>) -> String {
    format!("{:>5.1}", v.unwrap_or(0.0))
}

pub fn draw_top_processes(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: Option<&MetricsSnapshot>,
    sort_by: ProcSortBy,
) {
    let Some(mm) = m else {
        f.render_widget(Block::default().borders(Borders::ALL).title("Top Processes"), area);
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Top Processes ({})", mm.processes.len()));
    if mm.processes.is_empty() {
        let empty = Row::new(vec![Cell::from("No process information available")]);
        f.render_widget(Table::new([empty], [Constraint::Percentage(100)]).block(block), area);
        return;
    }

    let peak_cpu = mm
        .processes
        .iter()
        .filter_map(|p| p.cpu_percent)
        .fold(0.0_f64, f64::max);

    let rows = sorted_indices(&mm.processes, sort_by).into_iter().map(|ix| {
        let p = &mm.processes[ix];
        let cpu = p.cpu_percent.unwrap_or(0.0);
        let mem = p.memory_percent.unwrap_or(0.0);
        let cpu_fg = match cpu {
            x if x < 25.0 => Color::Green,
            x if x < 60.0 => Color::Yellow,
            _ => Color::Red,
        };
        let mem_fg = match mem {
            x if x < 5.0 => Color::Blue,
            x if x < 20.0 => Color::Magenta,
            _ => Color::Red,
        };
        let emphasis = if peak_cpu > 0.0 && (cpu - peak_cpu).abs() < f64::EPSILON {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(p.pid.to_string()).style(Style::default().fg(MUTED)),
            Cell::from(p.name.clone()),
            Cell::from(p.username.clone().unwrap_or_else(|| "N/A".into())),
            Cell::from(fmt_pct(p.cpu_percent)).style(Style::default().fg(cpu_fg)),
            Cell::from(fmt_pct(p.memory_percent)).style(Style::default().fg(mem_fg)),
        ])
        .style(emphasis)
    });

    let cpu_hdr = match sort_by {
        ProcSortBy::CpuDesc => "CPU % •",
        _ => "CPU %",
    };
    let mem_hdr = match sort_by {
        ProcSortBy::MemDesc => "Mem % •",
        _ => "Mem %",
    };
    let header = Row::new(vec!["PID", "Name", "User", cpu_hdr, mem_hdr]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, COLS)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: u32, cpu: Option<f64>, mem: Option<f64>) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: format!("p{pid}"),
            username: None,
            cpu_percent: cpu,
            memory_percent: mem,
        }
    }

    #[test]
    fn sorts_descending_with_missing_as_zero() {
        let procs = vec![
            proc(1, Some(5.0), Some(50.0)),
            proc(2, None, Some(1.0)),
            proc(3, Some(70.0), None),
        ];
        assert_eq!(sorted_indices(&procs, ProcSortBy::CpuDesc), vec![2, 0, 1]);
        assert_eq!(sorted_indices(&procs, ProcSortBy::MemDesc), vec![0, 1, 2]);
        assert_eq!(ProcSortBy::CpuDesc.toggle(), ProcSortBy::MemDesc);
    }
}
