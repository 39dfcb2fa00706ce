// UI and formatting module

pub mod formatters;
pub mod monitor_tui;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_latency_ms, format_size_kb};
pub use monitor_tui::run_monitor_app;
