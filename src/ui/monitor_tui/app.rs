use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::MonitorConfig;
use crate::core::system_monitor::{ProcessEntry, SamplingEngine, SortKey};

use super::event_handler::{map_key, MonitorEvent};
use super::render::render_ui;

/// One-line feedback shown above the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Monitor application state
pub struct MonitorApp {
    pub engine: SamplingEngine,
    pub should_quit: bool,
    pub show_help: bool,
    /// Process awaiting a y/n answer before it is terminated
    pub pending_kill: Option<ProcessEntry>,
    pub status: Option<StatusMessage>,
}

impl MonitorApp {
    pub fn new(engine: SamplingEngine) -> Self {
        Self {
            engine,
            should_quit: false,
            show_help: false,
            pending_kill: None,
            status: None,
        }
    }

    /// Run one sampling cycle
    pub fn update_metrics(&mut self) -> Result<()> {
        self.engine
            .sample()
            .context("Failed to collect metrics")?;
        Ok(())
    }

    pub fn confirming(&self) -> bool {
        self.pending_kill.is_some()
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) -> Result<()> {
        // Any key closes the help overlay
        if self.show_help && event != MonitorEvent::None {
            self.show_help = false;
            return Ok(());
        }

        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = true,
            MonitorEvent::RefreshNow => self.update_metrics()?,
            MonitorEvent::ToggleAlerts => {
                let shown = self.engine.toggle_alerts();
                self.set_status(
                    format!("Alert panel {}", if shown { "enabled" } else { "disabled" }),
                    false,
                );
            }
            MonitorEvent::SortByCpu => self.engine.processes_mut().set_sort_key(SortKey::Cpu),
            MonitorEvent::SortByMemory => {
                self.engine.processes_mut().set_sort_key(SortKey::Memory)
            }
            MonitorEvent::ScrollUp => self.engine.processes_mut().scroll(-1),
            MonitorEvent::ScrollDown => self.engine.processes_mut().scroll(1),
            MonitorEvent::PageUp => self.engine.processes_mut().page_scroll(-1),
            MonitorEvent::PageDown => self.engine.processes_mut().page_scroll(1),
            MonitorEvent::JumpToStart => self.engine.processes_mut().jump_to_start(),
            MonitorEvent::JumpToEnd => self.engine.processes_mut().jump_to_end(),
            MonitorEvent::KillHighest => match self.engine.highest_cpu() {
                Some(process) => self.pending_kill = Some(process),
                None => self.set_status("No process to terminate", true),
            },
            MonitorEvent::ConfirmKill => self.confirm_kill(),
            MonitorEvent::CancelKill => {
                self.pending_kill = None;
                self.set_status("Termination cancelled", false);
            }
            MonitorEvent::None => {}
        }
        Ok(())
    }

    fn confirm_kill(&mut self) {
        let Some(process) = self.pending_kill.take() else {
            return;
        };

        match self.engine.terminate(process.pid) {
            Ok(terminated) => self.set_status(
                format!(
                    "Sent {} to PID {} ({})",
                    terminated.signal, terminated.pid, terminated.name
                ),
                false,
            ),
            Err(e) => {
                log::warn!("Termination of PID {} failed: {}", process.pid, e);
                self.set_status(e.to_string(), true);
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
        });
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: MonitorConfig) -> Result<()> {
    let tick_rate = config.refresh_interval();
    let mut app = MonitorApp::new(SamplingEngine::for_live_system(config));

    // Fail before touching the terminal if /proc is unusable
    app.update_metrics()?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    let event = map_key(key.code, app.confirming());
                    app.handle_event(event)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.update_metrics()?;
            last_tick = Instant::now();
        }
    }
}
