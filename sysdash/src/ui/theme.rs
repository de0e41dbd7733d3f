//! Shared UI theme constants.

use ratatui::style::Color;

// Usage levels
pub const LEVEL_LOW: Color = Color::Green;
pub const LEVEL_MID: Color = Color::Yellow;
pub const LEVEL_HIGH: Color = Color::Red;

pub const SENT: Color = Color::Blue;
pub const RECV: Color = Color::Green;
pub const CPU: Color = Color::Cyan;
pub const MEM: Color = Color::Magenta;
pub const SWAP: Color = Color::Yellow;
pub const MUTED: Color = Color::DarkGray;
