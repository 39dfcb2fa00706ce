use chrono::{DateTime, Local};
use humansize::{format_size, BINARY};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Placeholder for metrics that could not be computed this cycle
pub const UNAVAILABLE: &str = "N/A";

/// Format a kilobyte count in human-readable binary units (KiB, MiB, GiB)
pub fn format_size_kb(kb: u64) -> String {
    format_size(kb.saturating_mul(1024), BINARY)
}

/// Format an optional latency in milliseconds
pub fn format_latency_ms(latency: Option<f64>) -> String {
    match latency {
        Some(ms) => format!("{:.2} ms", ms),
        None => UNAVAILABLE.to_string(),
    }
}

pub fn format_latency_ns(latency: f32) -> String {
    format!("{:.1} ns", latency)
}

pub fn format_percent(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => UNAVAILABLE.to_string(),
    }
}

/// Format a Unix timestamp as local wall-clock time (HH:MM:SS)
pub fn format_clock(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Truncate to a display width, ending in "..." when shortened.
/// Wide characters (CJK, emoji) count as two columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let cw = ch.width().unwrap_or(0);
        if width + cw > budget {
            break;
        }
        out.push(ch);
        width += cw;
    }
    out.push_str("...");
    out
}
