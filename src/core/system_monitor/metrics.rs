use serde::{Deserialize, Serialize};

use super::alerts::AlertLevel;

/// Complete derived metrics for one sampling cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub timestamp: i64, // Unix timestamp
    /// Measured time since the previous cycle, if any
    pub elapsed_ms: Option<u64>,
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub disks: Vec<DiskMetrics>,
    pub alert_level: AlertLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuMetrics {
    pub total_usage: f32,
    pub per_core_usage: Vec<f32>,
    pub core_count: usize,
    /// False until two snapshots have been differenced. Usage values are
    /// not meaningful before that and must not drive alerts.
    pub ready: bool,
}

/// Memory metrics in kilobytes.
///
/// `cache_hit_rate` and `latency_ns` are model approximations derived from the
/// cache/buffer share and overall utilization. They are not hardware counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
    pub used_kb: u64,
    pub usage_percent: f32,
    pub swap_total_kb: u64,
    pub swap_free_kb: u64,
    pub swap_used_kb: u64,
    pub swap_percent: f32,
    pub cached_kb: u64,
    pub buffers_kb: u64,
    /// Simulated cache hit rate (%), `None` when total memory is 0
    pub cache_hit_rate: Option<f32>,
    /// Simulated access latency (ns)
    pub latency_ns: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskMetrics {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_kb: u64,
    pub free_kb: u64,
    pub used_kb: u64,
    pub usage_percent: f32,
    /// Average read latency over the last cycle, `None` when unavailable
    pub read_latency_ms: Option<f64>,
    /// Cumulative reads + writes, when the device has I/O counters
    pub io_operations: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
}
