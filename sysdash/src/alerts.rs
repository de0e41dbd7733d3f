//! Threshold alerts over received snapshots.
//!
//! Thresholds live in `alerts.json` next to the profiles. An alert fires once a
//! metric has been strictly above its threshold for `duration` consecutive checks.

use std::collections::{HashMap, VecDeque};
use std::{fs, io, path::PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::history::push_capped;
use crate::profiles::config_dir;
use crate::types::MetricsSnapshot;

/// Alerts kept in memory.
pub const ALERT_LOG_CAP: usize = 100;
pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub enabled: bool,
    pub threshold: f64,
    /// Consecutive checks above the threshold before alerting.
    pub duration: u32,
}

impl Threshold {
    const fn new(threshold: f64, duration: u32) -> Self {
        Self {
            enabled: true,
            threshold,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_cpu")]
    pub cpu: Threshold,
    #[serde(default = "default_memory")]
    pub memory: Threshold,
    #[serde(default = "default_disk")]
    pub disk: Threshold,
    #[serde(default = "default_swap")]
    pub swap: Threshold,
}

fn default_cpu() -> Threshold {
    Threshold::new(80.0, 2)
}
fn default_memory() -> Threshold {
    Threshold::new(90.0, 2)
}
fn default_disk() -> Threshold {
    Threshold::new(85.0, 1)
}
fn default_swap() -> Threshold {
    Threshold::new(80.0, 2)
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cpu: default_cpu(),
            memory: default_memory(),
            disk: default_disk(),
            swap: default_swap(),
        }
    }
}

pub fn alerts_path() -> PathBuf {
    config_dir().join("alerts.json")
}

impl AlertConfig {
    /// Read the thresholds file. A missing file is created with the defaults;
    /// a corrupt one is left alone and the defaults are used.
    pub fn load_or_default() -> Self {
        let path = alerts_path();
        match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(path = %path.display(), "alert config unreadable, using defaults: {e}");
                Self::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = Self::default();
                if let Err(e) = cfg.save() {
                    warn!(path = %path.display(), "could not write default alert config: {e}");
                }
                cfg
            }
            Err(e) => {
                warn!(path = %path.display(), "alert config unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let path = alerts_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self).map_err(io::Error::other)?;
        fs::write(path, data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Cpu,
    Memory,
    Swap,
    Disk { mount: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub level: AlertLevel,
    pub message: String,
    pub timestamp: NaiveDateTime,
}

pub struct AlertEvaluator {
    config: AlertConfig,
    streaks: HashMap<AlertKind, u32>,
    log: VecDeque<Alert>,
}

impl AlertEvaluator {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            streaks: HashMap::new(),
            log: VecDeque::with_capacity(ALERT_LOG_CAP),
        }
    }

    /// Evaluate one snapshot; returns the alerts it raised.
    pub fn check(&mut self, m: &MetricsSnapshot) -> Vec<Alert> {
        let cfg = self.config.clone();
        let mut raised = Vec::new();

        self.evaluate(
            &cfg.cpu,
            AlertKind::Cpu,
            m.cpu.average_percent,
            || format!("CPU usage is high: {:.1}%", m.cpu.average_percent),
            m.timestamp,
            &mut raised,
        );
        self.evaluate(
            &cfg.memory,
            AlertKind::Memory,
            m.memory.percent,
            || format!("Memory usage is high: {:.1}%", m.memory.percent),
            m.timestamp,
            &mut raised,
        );
        self.evaluate(
            &cfg.swap,
            AlertKind::Swap,
            m.memory.swap.percent,
            || format!("Swap usage is high: {:.1}%", m.memory.swap.percent),
            m.timestamp,
            &mut raised,
        );
        // Mounts that vanished lose their streak.
        self.streaks.retain(|k, _| match k {
            AlertKind::Disk { mount } => m.disk.contains_key(mount),
            _ => true,
        });
        for (mount, usage) in &m.disk {
            self.evaluate(
                &cfg.disk,
                AlertKind::Disk {
                    mount: mount.clone(),
                },
                usage.percent,
                || format!("Disk usage for {mount} is high: {:.1}%", usage.percent),
                m.timestamp,
                &mut raised,
            );
        }

        for a in &raised {
            info!(kind = ?a.kind, "{}", a.message);
            push_capped(&mut self.log, a.clone(), ALERT_LOG_CAP);
        }
        raised
    }

    fn evaluate(
        &mut self,
        t: &Threshold,
        kind: AlertKind,
        value: f64,
        message: impl FnOnce() -> String,
        timestamp: NaiveDateTime,
        out: &mut Vec<Alert>,
    ) {
        if !t.enabled || value <= t.threshold {
            self.streaks.remove(&kind);
            return;
        }
        let streak = self.streaks.entry(kind.clone()).or_insert(0);
        *streak = streak.saturating_add(1);
        if *streak >= t.duration.max(1) {
            out.push(Alert {
                kind,
                level: AlertLevel::Warning,
                message: format!("{} (threshold: {}%)", message(), t.threshold),
                timestamp,
            });
        }
    }

    /// Most recent alerts, oldest first, at most `limit` of them.
    pub fn recent(&self, limit: usize) -> Vec<Alert> {
        let skip = self.log.len().saturating_sub(limit);
        self.log.iter().skip(skip).cloned().collect()
    }
}
