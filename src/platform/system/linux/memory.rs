use crate::core::system_monitor::MemorySnapshot;
use crate::error::{MonitorError, Result};

/// Parse `/proc/meminfo`. Values are already in kB.
pub fn parse_meminfo(content: &str, path: &str) -> Result<MemorySnapshot> {
    let mut snapshot = MemorySnapshot::default();
    let mut saw_total = false;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<u64>() else {
            log::debug!("Skipping meminfo line: {:?}", line);
            continue;
        };

        match key {
            "MemTotal:" => {
                snapshot.total_kb = value;
                saw_total = true;
            }
            "MemFree:" => snapshot.free_kb = value,
            "MemAvailable:" => snapshot.available_kb = value,
            "SwapTotal:" => snapshot.swap_total_kb = value,
            "SwapFree:" => snapshot.swap_free_kb = value,
            "Cached:" => snapshot.cached_kb = value,
            "Buffers:" => snapshot.buffers_kb = value,
            _ => {}
        }
    }

    if !saw_total {
        return Err(MonitorError::parse_anomaly(path, "no MemTotal line"));
    }

    Ok(snapshot)
}
