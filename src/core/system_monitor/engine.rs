//! Derivation of rates and percentages from raw counter snapshots.
//!
//! Cumulative counters are differenced across consecutive snapshots. A counter
//! that goes backwards (reset, hotplug) yields no delta for that cycle and the
//! previously derived value is kept.

use std::collections::HashMap;

use super::metrics::{CpuMetrics, DiskMetrics, MemoryMetrics};
use super::snapshot::{
    CpuTimeSnapshot, CpuTimes, DiskIoSnapshot, MemorySnapshot, MountedFilesystem,
};

/// Base of the simulated cache hit rate (%)
const CACHE_HIT_BASE: f32 = 70.0;
/// Hit-rate points gained per percent of memory used for cache and buffers
const CACHE_HIT_PER_CACHE_PERCENT: f32 = 0.25;
const CACHE_HIT_CAP: f32 = 99.0;
/// Simulated latency of an idle memory subsystem (ns)
const MEMORY_LATENCY_BASE_NS: f32 = 60.0;
/// Extra simulated latency at 100% utilization (ns)
const MEMORY_LATENCY_LOAD_NS: f32 = 40.0;

/// Holds the previous snapshot per differenced domain and the last derived
/// values, so that a cycle with no valid delta can keep showing them.
#[derive(Debug, Default)]
pub struct MetricsEngine {
    prev_cpu: Option<CpuTimeSnapshot>,
    cpu: CpuMetrics,
    prev_disk_io: Option<DiskIoSnapshot>,
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current CPU snapshot and return the derived metrics.
    /// The snapshot is retained for exactly one cycle.
    pub fn update_cpu(&mut self, curr: CpuTimeSnapshot) -> &CpuMetrics {
        self.cpu = compute_cpu(self.prev_cpu.as_ref(), &curr, &self.cpu);
        self.prev_cpu = Some(curr);
        &self.cpu
    }

    pub fn cpu(&self) -> &CpuMetrics {
        &self.cpu
    }

    /// Compute disk space metrics and fill in read latency from the I/O
    /// counter delta. `None` counters (source missing) leave latency unavailable.
    pub fn update_disks(
        &mut self,
        filesystems: &[MountedFilesystem],
        io: Option<DiskIoSnapshot>,
    ) -> Vec<DiskMetrics> {
        let mut disks: Vec<DiskMetrics> = filesystems.iter().map(compute_disk_space).collect();

        match io {
            Some(curr) => {
                let latencies = match self.prev_disk_io.as_ref() {
                    Some(prev) => {
                        let devices: Vec<&str> =
                            filesystems.iter().map(|fs| fs.short_name()).collect();
                        compute_disk_latency(prev, &curr, &devices)
                    }
                    None => HashMap::new(),
                };

                for (disk, fs) in disks.iter_mut().zip(filesystems) {
                    let name = fs.short_name();
                    disk.read_latency_ms = latencies.get(name).copied().flatten();
                    disk.io_operations = curr
                        .get(name)
                        .map(|c| c.reads_completed + c.writes_completed);
                }

                self.prev_disk_io = Some(curr);
            }
            None => {
                self.prev_disk_io = None;
            }
        }

        disks
    }
}

/// Derive total and per-core usage from two consecutive snapshots.
///
/// With no previous snapshot the result is not ready and all usages are zero.
/// Lines whose counters did not advance (or went backwards) keep the value
/// from `retained`.
pub fn compute_cpu(
    prev: Option<&CpuTimeSnapshot>,
    curr: &CpuTimeSnapshot,
    retained: &CpuMetrics,
) -> CpuMetrics {
    let core_count = curr.core_count();

    let Some(prev) = prev else {
        return CpuMetrics {
            total_usage: 0.0,
            per_core_usage: vec![0.0; core_count],
            core_count,
            ready: false,
        };
    };

    let total_usage = line_usage(&prev.aggregate, &curr.aggregate).unwrap_or(retained.total_usage);

    let per_core_usage = curr
        .cores
        .iter()
        .enumerate()
        .map(|(i, core)| {
            prev.cores
                .get(i)
                .and_then(|p| line_usage(p, core))
                .or_else(|| retained.per_core_usage.get(i).copied())
                .unwrap_or(0.0)
        })
        .collect();

    CpuMetrics {
        total_usage,
        per_core_usage,
        core_count,
        ready: true,
    }
}

/// Usage of one CPU line, or `None` when there is no valid delta.
fn line_usage(prev: &CpuTimes, curr: &CpuTimes) -> Option<f32> {
    let total_delta = curr.total().checked_sub(prev.total())?;
    let idle_delta = curr.idle_time().checked_sub(prev.idle_time())?;

    if total_delta == 0 {
        return None;
    }

    let usage = 100.0 * (1.0 - idle_delta as f64 / total_delta as f64);
    Some(usage.clamp(0.0, 100.0) as f32)
}

/// Point-in-time memory metrics, including the cache/latency model.
pub fn compute_memory(snapshot: &MemorySnapshot) -> MemoryMetrics {
    let used_kb = snapshot.total_kb.saturating_sub(snapshot.available_kb);
    let usage_percent = percent_of(used_kb, snapshot.total_kb);

    let swap_used_kb = snapshot.swap_total_kb.saturating_sub(snapshot.swap_free_kb);
    let swap_percent = percent_of(swap_used_kb, snapshot.swap_total_kb);

    let cache_hit_rate = if snapshot.total_kb > 0 {
        let cache_percent = percent_of(snapshot.cached_kb + snapshot.buffers_kb, snapshot.total_kb);
        Some((CACHE_HIT_BASE + cache_percent * CACHE_HIT_PER_CACHE_PERCENT).min(CACHE_HIT_CAP))
    } else {
        None
    };

    let latency_ns = MEMORY_LATENCY_BASE_NS + MEMORY_LATENCY_LOAD_NS * usage_percent / 100.0;

    MemoryMetrics {
        total_kb: snapshot.total_kb,
        free_kb: snapshot.free_kb,
        available_kb: snapshot.available_kb,
        used_kb,
        usage_percent,
        swap_total_kb: snapshot.swap_total_kb,
        swap_free_kb: snapshot.swap_free_kb,
        swap_used_kb,
        swap_percent,
        cached_kb: snapshot.cached_kb,
        buffers_kb: snapshot.buffers_kb,
        cache_hit_rate,
        latency_ns,
    }
}

/// Space metrics for one filesystem. Latency is filled in separately.
pub fn compute_disk_space(fs: &MountedFilesystem) -> DiskMetrics {
    let used_kb = fs.total_kb.saturating_sub(fs.free_kb);

    DiskMetrics {
        device: fs.device.clone(),
        mount_point: fs.mount_point.clone(),
        fs_type: fs.fs_type.clone(),
        total_kb: fs.total_kb,
        free_kb: fs.free_kb,
        used_kb,
        usage_percent: percent_of(used_kb, fs.total_kb),
        read_latency_ms: None,
        io_operations: None,
    }
}

/// Average read latency per device over the interval between two counter
/// snapshots. Devices missing from either snapshot, or with no completed
/// reads in the interval, map to `None`.
pub fn compute_disk_latency(
    prev: &DiskIoSnapshot,
    curr: &DiskIoSnapshot,
    devices: &[&str],
) -> HashMap<String, Option<f64>> {
    devices
        .iter()
        .map(|&device| {
            let latency = match (prev.get(device), curr.get(device)) {
                (Some(p), Some(c)) => {
                    let reads = c.reads_completed.checked_sub(p.reads_completed);
                    let read_ms = c.read_time_ms.checked_sub(p.read_time_ms);
                    match (reads, read_ms) {
                        (Some(reads), Some(read_ms)) if reads > 0 => {
                            Some(read_ms as f64 / reads as f64)
                        }
                        _ => None,
                    }
                }
                _ => None,
            };
            (device.to_string(), latency)
        })
        .collect()
}

fn percent_of(part: u64, total: u64) -> f32 {
    if total > 0 {
        (100.0 * part as f64 / total as f64) as f32
    } else {
        0.0
    }
}
