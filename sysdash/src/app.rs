//! App controller and main loop: input handling, fetching metrics, deriving
//! rates and alerts, and drawing.
//!
//! Network calls run as spawned tasks and report back over one channel; all
//! state changes happen in `handle_event` on the loop task.

use std::io;

use chrono::{Local, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::alerts::{AlertConfig, AlertEvaluator, DEFAULT_RECENT_LIMIT};
use crate::client::{validate_interval, MetricsClient};
use crate::error::ClientError;
use crate::history::{HistoryView, TimeRange};
use crate::rate::{CounterSample, RateTracker};
use crate::scheduler::{RefreshScheduler, ScheduleState};
use crate::sequence::RequestSequencer;
use crate::types::MetricsSnapshot;
use crate::ui::dashboard::View;
use crate::ui::{Dashboard, Presenter, Status};

pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Auto-refresh cadences offered by the interval key.
pub const INTERVAL_PRESETS_SECS: [u64; 4] = [5, 10, 30, 60];

/// Next preset above `current`, wrapping to the shortest.
pub fn next_interval_preset(current: u64) -> u64 {
    INTERVAL_PRESETS_SECS
        .iter()
        .copied()
        .find(|&p| p > current)
        .unwrap_or(INTERVAL_PRESETS_SECS[0])
}

/// Completions and timer ticks, delivered to the loop task.
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Latest {
        seq: u64,
        result: Result<MetricsSnapshot, ClientError>,
    },
    History {
        seq: u64,
        result: Result<Vec<MetricsSnapshot>, ClientError>,
    },
    ScheduleStarted {
        interval_secs: u64,
        result: Result<String, ClientError>,
    },
    ScheduleStopped(Result<String, ClientError>),
    Collected(Result<String, ClientError>),
}

#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    /// Cadence used when auto-refresh is switched on.
    pub interval_secs: u64,
    pub range: TimeRange,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            range: TimeRange::default(),
        }
    }
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send>;

pub struct App<P: Presenter> {
    client: MetricsClient,
    presenter: P,
    rates: RateTracker,
    sequencer: RequestSequencer,
    history_sequencer: RequestSequencer,
    scheduler: RefreshScheduler,
    alerts: AlertEvaluator,
    settings: AppSettings,
    history_loaded: bool,
    clock: Clock,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl<P: Presenter> App<P> {
    pub fn new(
        client: MetricsClient,
        presenter: P,
        alerts: AlertConfig,
        settings: AppSettings,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let tick_tx = tx.clone();
        let scheduler = RefreshScheduler::new(move || {
            let _ = tick_tx.send(AppEvent::Tick);
        });
        Self {
            client,
            presenter,
            rates: RateTracker::new(),
            sequencer: RequestSequencer::new(),
            history_sequencer: RequestSequencer::new(),
            scheduler,
            alerts: AlertEvaluator::new(alerts),
            settings,
            history_loaded: false,
            clock: Box::new(|| Local::now().naive_local()),
            tx,
            rx,
            should_quit: false,
        }
    }

    /// Replace the wall clock used for history windows.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn schedule_state(&self) -> ScheduleState {
        self.scheduler.state()
    }

    pub fn history_loaded(&self) -> bool {
        self.history_loaded
    }

    /// Wait for the next completion or tick.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    pub fn request_latest(&mut self) {
        self.presenter.show_status(Status::Loading);
        let seq = self.sequencer.next();
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_latest().await;
            let _ = tx.send(AppEvent::Latest { seq, result });
        });
    }

    pub fn request_history(&mut self) {
        let seq = self.history_sequencer.next();
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_history().await;
            let _ = tx.send(AppEvent::History { seq, result });
        });
    }

    /// Ask the server to collect on a schedule; the local timer follows on success.
    pub fn request_start_schedule(&mut self, interval_secs: u64) {
        if let Err(e) = validate_interval(interval_secs) {
            self.presenter.show_status(Status::Error(e.to_string()));
            return;
        }
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.start_schedule(interval_secs).await;
            let _ = tx.send(AppEvent::ScheduleStarted {
                interval_secs,
                result,
            });
        });
    }

    pub fn request_stop_schedule(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::ScheduleStopped(client.stop_schedule().await));
        });
    }

    /// One-off server-side collection, followed by a refresh.
    pub fn request_collect(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::Collected(client.trigger_collection().await));
        });
    }

    pub fn cycle_range(&mut self) {
        self.settings.range = self.settings.range.next();
        self.presenter.show_status(Status::Info(format!(
            "History window: last {}",
            self.settings.range.label()
        )));
        if self.history_loaded {
            self.request_history();
        }
    }

    /// Step the auto-refresh cadence; a running schedule is restarted at the new one.
    pub fn cycle_interval(&mut self) {
        self.settings.interval_secs = next_interval_preset(self.settings.interval_secs);
        let secs = self.settings.interval_secs;
        if self.scheduler.is_active() {
            self.request_start_schedule(secs);
        } else {
            self.presenter.show_status(Status::Info(format!(
                "Auto-refresh interval: {secs}s (press a to start)"
            )));
        }
    }

    pub fn handle_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Tick => self.request_latest(),
            AppEvent::Latest { seq, result } => self.apply_latest(seq, result),
            AppEvent::History { seq, result } => self.apply_history(seq, result),
            AppEvent::ScheduleStarted {
                interval_secs,
                result,
            } => match result {
                Ok(message) => match self.scheduler.start(interval_secs) {
                    Ok(()) => {
                        info!(interval_secs, "auto-refresh on");
                        self.presenter.show_schedule(self.scheduler.state());
                        self.presenter.show_status(Status::Info(format!(
                            "{message}. Auto-refreshing metrics..."
                        )));
                    }
                    Err(e) => self.presenter.show_status(Status::Error(e.to_string())),
                },
                Err(e) => {
                    warn!("schedule start failed: {e}");
                    self.presenter.show_status(Status::Error(format!(
                        "Failed to schedule metrics collection: {e}"
                    )));
                }
            },
            AppEvent::ScheduleStopped(result) => match result {
                Ok(message) => {
                    self.scheduler.stop();
                    info!("auto-refresh off");
                    self.presenter.show_schedule(self.scheduler.state());
                    self.presenter.show_status(Status::Info(message));
                }
                Err(e) => {
                    warn!("schedule stop failed: {e}");
                    self.presenter.show_status(Status::Error(format!(
                        "Failed to stop scheduled collection: {e}"
                    )));
                }
            },
            AppEvent::Collected(result) => match result {
                Ok(message) => {
                    self.presenter.show_status(Status::Info(message));
                    self.request_latest();
                }
                Err(e) => {
                    warn!("manual collection failed: {e}");
                    self.presenter.show_status(Status::Error(format!(
                        "Failed to trigger collection: {e}"
                    )));
                }
            },
        }
    }

    fn apply_latest(&mut self, seq: u64, result: Result<MetricsSnapshot, ClientError>) {
        if self.sequencer.is_stale(seq) {
            debug!(
                seq,
                applied = self.sequencer.latest_applied(),
                "discarding stale response"
            );
            return;
        }
        let snapshot = match result {
            Ok(s) => s,
            Err(e) => {
                // Keep whatever is on screen; the schedule keeps running.
                warn!(seq, "fetch latest failed: {e}");
                self.presenter.show_status(Status::Error(format!(
                    "Failed to collect metrics: {e}"
                )));
                return;
            }
        };
        self.sequencer.accept(seq);

        let rate = self.rates.observe(CounterSample::from(&snapshot));
        let raised = self.alerts.check(&snapshot);
        self.presenter.show_snapshot(&snapshot, rate);
        if !raised.is_empty() {
            self.presenter.show_alerts(&self.alerts.recent(DEFAULT_RECENT_LIMIT));
        }
        self.presenter
            .show_status(Status::Success("Metrics collected successfully!".into()));

        if self.history_loaded && self.presenter.history_visible() {
            self.request_history();
        }
    }

    fn apply_history(&mut self, seq: u64, result: Result<Vec<MetricsSnapshot>, ClientError>) {
        if self.history_sequencer.is_stale(seq) {
            debug!(
                seq,
                applied = self.history_sequencer.latest_applied(),
                "discarding stale history"
            );
            return;
        }
        let series = match result {
            Ok(s) => s,
            Err(e) => {
                warn!("fetch history failed: {e}");
                self.presenter.show_status(Status::Error(format!(
                    "Failed to load historical data: {e}"
                )));
                return;
            }
        };
        self.history_sequencer.accept(seq);
        if series.is_empty() {
            self.presenter
                .show_status(Status::Info("No historical data available yet.".into()));
            return;
        }
        let range = self.settings.range;
        let view = HistoryView::build(&series, range, (self.clock)());
        if view.is_empty() {
            self.presenter.show_status(Status::Info(format!(
                "No data available for the last {}.",
                range.label()
            )));
            return;
        }
        debug!(
            total = series.len(),
            shown = view.entries.len(),
            "history window applied"
        );
        self.presenter.show_history(view);
        self.history_loaded = true;
    }
}

impl App<Dashboard> {
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        self.request_latest();
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k.code);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            while let Ok(ev) = self.rx.try_recv() {
                self.handle_event(ev);
            }

            terminal.draw(|f| self.presenter.draw(f))?;

            sleep(Duration::from_millis(100)).await;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.request_latest(),
            KeyCode::Char('c') => self.request_collect(),
            KeyCode::Char('a') => self.request_start_schedule(self.settings.interval_secs),
            KeyCode::Char('x') => self.request_stop_schedule(),
            KeyCode::Char('h') => {
                if self.presenter.view != View::History {
                    self.request_history();
                }
                self.presenter.toggle_view(View::History);
            }
            KeyCode::Char('l') => self.presenter.toggle_view(View::Alerts),
            KeyCode::Char('t') => self.cycle_range(),
            KeyCode::Char('i') => self.cycle_interval(),
            KeyCode::Char('p') => {
                self.presenter.procs_sort_by = self.presenter.procs_sort_by.toggle();
            }
            _ => {}
        }
    }
}
