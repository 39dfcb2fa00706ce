//! Raw counter snapshots.
//!
//! Snapshots are immutable point-in-time reads of one OS counter domain.
//! They carry no derived math; see [`super::engine`] for that.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Cumulative CPU tick counters for one line of `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    pub fn idle_time(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn active_time(&self) -> u64 {
        self.total() - self.idle_time()
    }
}

/// Aggregate ("all cores") counters plus one entry per core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTimeSnapshot {
    pub aggregate: CpuTimes,
    pub cores: Vec<CpuTimes>,
}

impl CpuTimeSnapshot {
    pub fn core_count(&self) -> usize {
        self.cores.len()
    }
}

/// Memory and swap totals, all in kilobytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
    pub swap_total_kb: u64,
    pub swap_free_kb: u64,
    pub cached_kb: u64,
    pub buffers_kb: u64,
}

/// A mounted physical filesystem with its space usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountedFilesystem {
    /// Device path as listed in the mount table, e.g. `/dev/sda1`
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_kb: u64,
    pub free_kb: u64,
}

impl MountedFilesystem {
    /// Device name without its path, e.g. `sda1` for `/dev/sda1`.
    /// This is the key used to match `/proc/diskstats` entries.
    pub fn short_name(&self) -> &str {
        self.device.rsplit('/').next().unwrap_or(&self.device)
    }
}

/// Cumulative I/O counters for one block device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskIoCounters {
    pub reads_completed: u64,
    pub read_time_ms: u64,
    pub writes_completed: u64,
}

/// Per-device I/O counters keyed by device short name.
pub type DiskIoSnapshot = HashMap<String, DiskIoCounters>;

/// One process as read from the process table, before any percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProcess {
    pub pid: u32,
    pub name: String,
    pub resident_kb: u64,
    /// utime + stime, in clock ticks since the process started
    pub cpu_ticks: u64,
}

/// A source of counter snapshots for one platform.
///
/// CPU and memory reads are mandatory: an `Err` from them aborts the cycle.
/// The remaining reads are optional and callers degrade the affected metric
/// when they fail.
pub trait CounterSource {
    fn read_cpu_times(&self) -> Result<CpuTimeSnapshot>;

    fn read_memory(&self) -> Result<MemorySnapshot>;

    fn read_filesystems(&self) -> Result<Vec<MountedFilesystem>>;

    /// `Ok(None)` when the platform has no per-device counters available.
    fn read_disk_io(&self) -> Result<Option<DiskIoSnapshot>>;

    /// Processes that vanish mid-scan are skipped, not reported as errors.
    fn read_processes(&self) -> Result<Vec<RawProcess>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_times_derived_values() {
        let times = CpuTimes {
            user: 100,
            nice: 10,
            system: 50,
            idle: 800,
            iowait: 20,
            irq: 5,
            softirq: 10,
            steal: 5,
        };
        assert_eq!(times.total(), 1000);
        assert_eq!(times.idle_time(), 820);
        assert_eq!(times.active_time(), 180);
    }

    #[test]
    fn test_short_name_strips_path() {
        let fs = MountedFilesystem {
            device: "/dev/nvme0n1p2".to_string(),
            ..Default::default()
        };
        assert_eq!(fs.short_name(), "nvme0n1p2");

        let fs = MountedFilesystem {
            device: "rootfs".to_string(),
            ..Default::default()
        };
        assert_eq!(fs.short_name(), "rootfs");
    }
}
