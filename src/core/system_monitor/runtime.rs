//! Headless debug loop.
//!
//! Runs a fixed number of sampling cycles without a terminal UI and logs the
//! derived metrics, optionally printing one JSON object per cycle.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use super::collector::SamplingEngine;
use super::metrics::{ProcessEntry, SystemMetrics};

/// Processes listed per cycle in the log and JSON output
pub const TOP_PROCESS_COUNT: usize = 5;

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// One cycle's output in JSON mode.
#[derive(Debug, Serialize)]
pub struct CycleReport<'a> {
    pub cycle: u32,
    #[serde(flatten)]
    pub metrics: &'a SystemMetrics,
    pub process_count: usize,
    pub top_processes: &'a [ProcessEntry],
}

/// Run the configured number of debug cycles, stopping early once `running`
/// is cleared. Returns how many cycles completed.
pub fn run_debug_cycles<W: Write>(
    engine: &mut SamplingEngine,
    running: &AtomicBool,
    out: &mut W,
) -> Result<u32> {
    let cycles = engine.config().debug_cycles;
    let interval = engine.config().refresh_interval();
    let json = engine.config().json_output;

    log::info!(
        "Debug-only mode: {} cycles every {}ms",
        cycles,
        interval.as_millis()
    );

    let mut completed = 0;
    while completed < cycles && running.load(Ordering::SeqCst) {
        let cycle = completed + 1;
        engine
            .sample()
            .with_context(|| format!("Sampling failed in cycle {}", cycle))?;

        log_cycle(cycle, engine);

        if json {
            let entries = engine.processes().entries();
            let report = CycleReport {
                cycle,
                metrics: engine.metrics(),
                process_count: entries.len(),
                top_processes: &entries[..entries.len().min(TOP_PROCESS_COUNT)],
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
            out.flush()?;
        }

        completed = cycle;
        if completed < cycles {
            sleep_while_running(interval, running);
        }
    }

    if completed < cycles {
        log::info!("Interrupted after {} of {} cycles", completed, cycles);
    }
    Ok(completed)
}

fn log_cycle(cycle: u32, engine: &SamplingEngine) {
    let m = engine.metrics();

    log::info!("--- Cycle {} ---", cycle);
    if m.cpu.ready {
        log::info!(
            "CPU: {:.1}% across {} cores (alert: {:?})",
            m.cpu.total_usage,
            m.cpu.core_count,
            m.alert_level
        );
    } else {
        log::info!("CPU: warming up ({} cores)", m.cpu.core_count);
    }
    log::info!(
        "Memory: {:.1}% used ({} / {} KB), swap {:.1}%",
        m.memory.usage_percent,
        m.memory.used_kb,
        m.memory.total_kb,
        m.memory.swap_percent
    );
    match m.memory.cache_hit_rate {
        Some(rate) => log::debug!(
            "Memory model: cache hit {:.1}%, latency {:.1}ns",
            rate,
            m.memory.latency_ns
        ),
        None => log::debug!("Memory model: unavailable"),
    }
    for disk in &m.disks {
        match disk.read_latency_ms {
            Some(latency) => log::info!(
                "Disk {} ({}): {:.1}% used, read latency {:.2}ms",
                disk.mount_point,
                disk.device,
                disk.usage_percent,
                latency
            ),
            None => log::info!(
                "Disk {} ({}): {:.1}% used, read latency N/A",
                disk.mount_point,
                disk.device,
                disk.usage_percent
            ),
        }
    }

    let entries = engine.processes().entries();
    log::info!("Processes: {}", entries.len());
    for p in entries.iter().take(TOP_PROCESS_COUNT) {
        log::debug!(
            "  {:>7} {:<24} cpu {:>5.1}% mem {:>5.1}%",
            p.pid,
            p.name,
            p.cpu_percent,
            p.memory_percent
        );
    }
}

fn sleep_while_running(interval: Duration, running: &AtomicBool) {
    let mut remaining = interval;
    while !remaining.is_zero() && running.load(Ordering::SeqCst) {
        let step = remaining.min(SLEEP_SLICE);
        thread::sleep(step);
        remaining -= step;
    }
}
