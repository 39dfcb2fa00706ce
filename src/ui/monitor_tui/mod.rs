//! Terminal User Interface for the activity monitor.
//!
//! Provides a real-time dashboard using ratatui. All state lives in the
//! [`SamplingEngine`](crate::core::system_monitor::SamplingEngine); this layer
//! only renders it and maps keys to engine calls.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, MonitorApp, StatusMessage};
pub use event_handler::{map_key, MonitorEvent};
