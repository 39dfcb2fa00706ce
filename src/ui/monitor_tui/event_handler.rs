use crossterm::event::KeyCode;

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Sample immediately instead of waiting for the next tick
    RefreshNow,
    /// Show or hide the CPU alert panel
    ToggleAlerts,
    SortByCpu,
    SortByMemory,
    /// Ask to terminate the highest-CPU process
    KillHighest,
    ConfirmKill,
    CancelKill,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpToStart,
    JumpToEnd,
    /// Toggle help overlay
    ToggleHelp,
    /// No action
    None,
}

/// Map a key press to an event. While a kill confirmation is pending only
/// the answer keys do anything.
pub fn map_key(code: KeyCode, confirming: bool) -> MonitorEvent {
    if confirming {
        return match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => MonitorEvent::ConfirmKill,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => MonitorEvent::CancelKill,
            _ => MonitorEvent::None,
        };
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => MonitorEvent::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => MonitorEvent::RefreshNow,
        KeyCode::Char('t') | KeyCode::Char('T') => MonitorEvent::ToggleAlerts,
        KeyCode::Char('c') | KeyCode::Char('C') => MonitorEvent::SortByCpu,
        KeyCode::Char('m') | KeyCode::Char('M') => MonitorEvent::SortByMemory,
        KeyCode::Char('k') | KeyCode::Char('K') => MonitorEvent::KillHighest,
        KeyCode::Char('?') => MonitorEvent::ToggleHelp,
        KeyCode::Up => MonitorEvent::ScrollUp,
        KeyCode::Down => MonitorEvent::ScrollDown,
        KeyCode::PageUp => MonitorEvent::PageUp,
        KeyCode::PageDown => MonitorEvent::PageDown,
        KeyCode::Home => MonitorEvent::JumpToStart,
        KeyCode::End => MonitorEvent::JumpToEnd,
        _ => MonitorEvent::None,
    }
}
