//! Process table scanning over `<root>/<pid>/{status,stat}`.

use std::fs;
use std::path::Path;

use crate::core::system_monitor::RawProcess;
use crate::error::{MonitorError, Result};

const UNKNOWN_PROCESS_NAME: &str = "unknown";

/// Name and resident set size (KB) from a `status` file.
pub fn parse_status(content: &str) -> (String, u64) {
    let mut name = None;
    let mut resident_kb = 0;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("Name:") {
            let value = value.trim();
            if !value.is_empty() {
                name = Some(value.to_string());
            }
        } else if let Some(value) = line.strip_prefix("VmRSS:") {
            resident_kb = value
                .split_whitespace()
                .next()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
        }
    }

    (
        name.unwrap_or_else(|| UNKNOWN_PROCESS_NAME.to_string()),
        resident_kb,
    )
}

/// utime + stime from a `stat` file.
///
/// The command name in field 2 may contain spaces and parentheses, so fields
/// are counted from the last closing parenthesis.
pub fn parse_stat_cpu_ticks(content: &str) -> Option<u64> {
    let rest = &content[content.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some(utime.saturating_add(stime))
}

/// Read a proc file, tolerating non-UTF-8 bytes in command names.
fn read_lossy(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Read one process directory. `None` means the process went away mid-scan.
fn read_process(dir: &Path, pid: u32) -> Option<RawProcess> {
    let status = read_lossy(&dir.join("status"))?;
    let (name, resident_kb) = parse_status(&status);

    let cpu_ticks = read_lossy(&dir.join("stat"))
        .and_then(|stat| parse_stat_cpu_ticks(&stat))
        .unwrap_or(0);

    Some(RawProcess {
        pid,
        name,
        resident_kb,
        cpu_ticks,
    })
}

/// Enumerate every numeric directory under `root`.
pub fn scan_processes(root: &Path) -> Result<Vec<RawProcess>> {
    let dir = fs::read_dir(root)
        .map_err(|e| MonitorError::source_unavailable(root.display().to_string(), e))?;

    let mut processes = Vec::new();
    for entry in dir.flatten() {
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u32>().ok())
        else {
            continue;
        };

        match read_process(&entry.path(), pid) {
            Some(process) => processes.push(process),
            None => log::trace!("PID {} vanished during scan", pid),
        }
    }

    Ok(processes)
}
