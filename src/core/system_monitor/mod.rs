//! System monitoring core functionality.
//!
//! Raw counter snapshots come in through a [`CounterSource`]; the
//! [`SamplingEngine`] turns them into rates and percentages, maintains the
//! process list and drives the CPU alert and notification policy.

pub mod alerts;
mod collector;
pub mod engine;
mod metrics;
pub mod notifications;
pub mod process_registry;
pub mod runtime;
mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use alerts::{classify, AlertLevel, AlertStateMachine, AlertTransition};
pub use collector::SamplingEngine;
pub use engine::MetricsEngine;
pub use metrics::{CpuMetrics, DiskMetrics, MemoryMetrics, ProcessEntry, SystemMetrics};
pub use notifications::{build_notification, Notification, NotificationThrottler, Notifier};
pub use process_registry::{
    ProcessRegistry, ProcessSignaller, SignalError, SortKey, Terminated, TerminationSignal,
};
pub use runtime::run_debug_cycles;
pub use snapshot::{
    CounterSource, CpuTimeSnapshot, CpuTimes, DiskIoCounters, DiskIoSnapshot, MemorySnapshot,
    MountedFilesystem, RawProcess,
};
