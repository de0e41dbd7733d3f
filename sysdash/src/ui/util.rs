//! Small UI helpers: human-readable sizes, truncation, level colors.

use ratatui::style::Color;

use crate::types::Uptime;
use crate::ui::theme::{LEVEL_HIGH, LEVEL_LOW, LEVEL_MID};

pub fn human(b: u64) -> String {
    const K: f64 = 1024.0;
    let b = b as f64;
    if b < K { return format!("{b:.0}B"); }
    let kb = b / K;
    if kb < K { return format!("{kb:.1}KB"); }
    let mb = kb / K;
    if mb < K { return format!("{mb:.1}MB"); }
    let gb = mb / K;
    if gb < K { return format!("{gb:.1}GB"); }
    let tb = gb / K;
    format!("{tb:.2}TB")
}

/// Rates arrive as f64 bytes per second.
pub fn human_rate(bytes_per_sec: f64) -> String {
    format!("{}/s", human(bytes_per_sec.max(0.0).round() as u64))
}

pub fn gib(b: u64) -> String {
    format!("{:.2} GB", b as f64 / (1024.0 * 1024.0 * 1024.0))
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max { return s.to_string(); }
    if max <= 3 { return "...".into(); }
    let keep = max - 3;
    let left: String = s.chars().take(keep / 2).collect();
    let right: String = s.chars().skip(n - (keep - keep / 2)).collect();
    format!("{left}...{right}")
}

/// Green below 50%, yellow below 75%, red otherwise.
pub fn level_color(percent: f64) -> Color {
    if percent < 50.0 {
        LEVEL_LOW
    } else if percent < 75.0 {
        LEVEL_MID
    } else {
        LEVEL_HIGH
    }
}

/// Gauge percent; ratatui panics above 100.
pub fn gauge_pct(percent: f64) -> u16 {
    percent.clamp(0.0, 100.0).round() as u16
}

pub fn format_uptime(u: &Uptime) -> String {
    format!("{}d {}h {}m {}s", u.days, u.hours, u.minutes, u.seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_units() {
        assert_eq!(human(0), "0B");
        assert_eq!(human(1536), "1.5KB");
        assert_eq!(human(5 * 1024 * 1024), "5.0MB");
        assert_eq!(human_rate(150.0), "150B/s");
        assert_eq!(gib(2147483648), "2.00 GB");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("abcdefghij", 7), "ab...ij");
        assert_eq!(truncate_middle("ééééééééé", 5), "é...é");
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(level_color(49.9), LEVEL_LOW);
        assert_eq!(level_color(50.0), LEVEL_MID);
        assert_eq!(level_color(75.0), LEVEL_HIGH);
        assert_eq!(gauge_pct(180.0), 100);
        assert_eq!(gauge_pct(-1.0), 0);
    }
}
