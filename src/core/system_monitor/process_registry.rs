//! The live, sortable process list and process termination.
//!
//! The list is rebuilt from scratch every cycle. No identity is carried
//! between cycles; a process that exits simply disappears from the next list.

use std::cmp::Ordering;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::metrics::ProcessEntry;
use super::snapshot::RawProcess;
use crate::error::{MonitorError, Result};

/// Rows moved by one page scroll
pub const PAGE_SIZE: isize = 10;

/// Scale applied to cumulative process ticks (together with the core count)
/// to get the displayed CPU percentage. This is a coarse approximation of
/// lifetime CPU share, not an inter-sample delta.
pub const PROCESS_CPU_TICK_SCALE: f32 = 1000.0;

const GRACE_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// SIGTERM
    Graceful,
    /// SIGKILL
    Forceful,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationSignal::Graceful => write!(f, "SIGTERM"),
            TerminationSignal::Forceful => write!(f, "SIGKILL"),
        }
    }
}

/// Why a signal could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The process no longer exists
    NoSuchProcess,
    PermissionDenied,
    Other(String),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalError::NoSuchProcess => write!(f, "no such process"),
            SignalError::PermissionDenied => write!(f, "permission denied"),
            SignalError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// OS capability to signal processes.
pub trait ProcessSignaller {
    fn send(&self, pid: u32, signal: TerminationSignal) -> std::result::Result<(), SignalError>;

    fn is_alive(&self, pid: u32) -> bool;
}

/// Outcome of a successful [`ProcessRegistry::terminate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Terminated {
    pub pid: u32,
    pub name: String,
    /// The last signal that was sent
    pub signal: TerminationSignal,
}

#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    entries: Vec<ProcessEntry>,
    sort_key: SortKey,
    offset: usize,
    grace_period: Duration,
}

impl ProcessRegistry {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            entries: Vec::new(),
            sort_key: SortKey::default(),
            offset: 0,
            grace_period,
        }
    }

    /// Replace the list from a fresh process table read, then re-sort.
    /// Entries with pid 0 or no name are dropped.
    pub fn refresh(&mut self, raw: Vec<RawProcess>, total_memory_kb: u64, core_count: usize) {
        let cores = core_count.max(1) as f32;

        self.entries = raw
            .into_iter()
            .filter(|p| p.pid != 0 && !p.name.is_empty())
            .map(|p| ProcessEntry {
                cpu_percent: p.cpu_ticks as f32 / (PROCESS_CPU_TICK_SCALE * cores),
                memory_percent: if total_memory_kb > 0 {
                    (100.0 * p.resident_kb as f64 / total_memory_kb as f64) as f32
                } else {
                    0.0
                },
                pid: p.pid,
                name: p.name,
            })
            .collect();

        self.sort();
        self.clamp_offset();
    }

    pub fn entries(&self) -> &[ProcessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.sort();
    }

    pub fn scroll(&mut self, delta: isize) {
        let target = (self.offset as isize).saturating_add(delta);
        self.offset = target.clamp(0, self.max_offset() as isize) as usize;
    }

    pub fn page_scroll(&mut self, pages: isize) {
        self.scroll(pages.saturating_mul(PAGE_SIZE));
    }

    pub fn jump_to_start(&mut self) {
        self.offset = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.offset = self.max_offset();
    }

    /// Highest CPU consumer as the user sees it: forces the CPU sort first.
    pub fn highest_cpu(&mut self) -> Option<ProcessEntry> {
        if self.sort_key != SortKey::Cpu {
            self.set_sort_key(SortKey::Cpu);
        }
        self.entries.first().cloned()
    }

    /// Highest CPU consumer without touching the current sort order.
    pub fn top_cpu_consumer(&self) -> Option<&ProcessEntry> {
        self.entries
            .iter()
            .max_by(|a, b| a.cpu_percent.partial_cmp(&b.cpu_percent).unwrap_or(Ordering::Equal))
    }

    pub fn find(&self, pid: u32) -> Option<&ProcessEntry> {
        self.entries.iter().find(|p| p.pid == pid)
    }

    /// Send SIGTERM, wait up to the grace period, then SIGKILL a survivor.
    ///
    /// Success means the signal calls succeeded; process exit is not
    /// confirmed. The list itself is left untouched: the caller re-reads the
    /// process table afterwards.
    pub fn terminate(&self, pid: u32, signaller: &dyn ProcessSignaller) -> Result<Terminated> {
        if pid == 0 || pid == std::process::id() {
            return Err(MonitorError::ProtectedProcess(pid));
        }

        let entry = self.find(pid).ok_or(MonitorError::ProcessNotFound(pid))?;
        let name = entry.name.clone();

        signaller
            .send(pid, TerminationSignal::Graceful)
            .map_err(|e| {
                MonitorError::signal_delivery_failed(pid, TerminationSignal::Graceful.to_string(), e)
            })?;
        log::info!("Sent SIGTERM to PID {} ({})", pid, name);

        if !wait_for_exit(pid, signaller, self.grace_period) {
            match signaller.send(pid, TerminationSignal::Forceful) {
                Ok(()) => {
                    log::warn!("PID {} ({}) survived SIGTERM, sent SIGKILL", pid, name);
                    return Ok(Terminated {
                        pid,
                        name,
                        signal: TerminationSignal::Forceful,
                    });
                }
                // Exited between the last probe and the escalation
                Err(SignalError::NoSuchProcess) => {}
                Err(e) => {
                    return Err(MonitorError::signal_delivery_failed(
                        pid,
                        TerminationSignal::Forceful.to_string(),
                        e,
                    ));
                }
            }
        }

        Ok(Terminated {
            pid,
            name,
            signal: TerminationSignal::Graceful,
        })
    }

    fn sort(&mut self) {
        // sort_by is stable, so equal entries keep their table order
        match self.sort_key {
            SortKey::Cpu => self.entries.sort_by(|a, b| {
                b.cpu_percent
                    .partial_cmp(&a.cpu_percent)
                    .unwrap_or(Ordering::Equal)
            }),
            SortKey::Memory => self.entries.sort_by(|a, b| {
                b.memory_percent
                    .partial_cmp(&a.memory_percent)
                    .unwrap_or(Ordering::Equal)
            }),
        }
    }

    fn max_offset(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::core::config::DEFAULT_KILL_GRACE_MS))
    }
}

/// Poll liveness until the process is gone or the grace period runs out.
fn wait_for_exit(pid: u32, signaller: &dyn ProcessSignaller, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        if !signaller.is_alive(pid) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(GRACE_POLL_INTERVAL.min(deadline - now));
    }
}
