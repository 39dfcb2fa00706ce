//! In-memory sources and sinks for engine tests.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use super::notifications::{Notification, Notifier};
use super::process_registry::{ProcessSignaller, SignalError, TerminationSignal};
use super::snapshot::{
    CounterSource, CpuTimeSnapshot, CpuTimes, DiskIoSnapshot, MemorySnapshot, MountedFilesystem,
    RawProcess,
};
use crate::error::{MonitorError, Result};

/// Aggregate and two cores, all with the same busy/idle split.
pub fn cpu_snapshot(busy: u64, idle: u64) -> CpuTimeSnapshot {
    let times = CpuTimes {
        user: busy,
        idle,
        ..CpuTimes::default()
    };
    CpuTimeSnapshot {
        aggregate: times,
        cores: vec![times; 2],
    }
}

/// Replays scripted CPU snapshots; every other source is fixed.
///
/// Reading CPU times after the script runs out fails like a missing
/// `/proc/stat`. Pids signalled through [`FakeSource::signaller`] disappear
/// from later process scans.
pub struct FakeSource {
    cpu: RefCell<VecDeque<CpuTimeSnapshot>>,
    killed: Rc<RefCell<HashSet<u32>>>,
    pub processes: Vec<RawProcess>,
    pub fail_processes: bool,
}

impl FakeSource {
    pub fn new(cpu: Vec<CpuTimeSnapshot>) -> Self {
        Self {
            cpu: RefCell::new(cpu.into()),
            killed: Rc::default(),
            processes: vec![
                RawProcess {
                    pid: 4_190_001,
                    name: "busy".to_string(),
                    resident_kb: 10_000,
                    cpu_ticks: 150_000,
                },
                RawProcess {
                    pid: 4_190_002,
                    name: "idle".to_string(),
                    resident_kb: 250_000,
                    cpu_ticks: 20,
                },
            ],
            fail_processes: false,
        }
    }

    pub fn signaller(&self) -> FakeSignaller {
        FakeSignaller {
            killed: Rc::clone(&self.killed),
        }
    }
}

impl CounterSource for FakeSource {
    fn read_cpu_times(&self) -> Result<CpuTimeSnapshot> {
        self.cpu
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| MonitorError::source_unavailable("fake/stat", "script exhausted"))
    }

    fn read_memory(&self) -> Result<MemorySnapshot> {
        Ok(MemorySnapshot {
            total_kb: 1_000_000,
            free_kb: 100_000,
            available_kb: 250_000,
            cached_kb: 200_000,
            ..MemorySnapshot::default()
        })
    }

    fn read_filesystems(&self) -> Result<Vec<MountedFilesystem>> {
        Ok(vec![MountedFilesystem {
            device: "/dev/sda1".to_string(),
            mount_point: "/".to_string(),
            fs_type: "ext4".to_string(),
            total_kb: 1_000,
            free_kb: 400,
        }])
    }

    fn read_disk_io(&self) -> Result<Option<DiskIoSnapshot>> {
        Ok(None)
    }

    fn read_processes(&self) -> Result<Vec<RawProcess>> {
        if self.fail_processes {
            return Err(MonitorError::source_unavailable("fake", "no process table"));
        }
        let killed = self.killed.borrow();
        Ok(self
            .processes
            .iter()
            .filter(|p| !killed.contains(&p.pid))
            .cloned()
            .collect())
    }
}

/// Every signal succeeds and the target exits immediately.
#[derive(Default)]
pub struct FakeSignaller {
    killed: Rc<RefCell<HashSet<u32>>>,
}

impl ProcessSignaller for FakeSignaller {
    fn send(&self, pid: u32, _signal: TerminationSignal) -> std::result::Result<(), SignalError> {
        self.killed.borrow_mut().insert(pid);
        Ok(())
    }

    fn is_alive(&self, pid: u32) -> bool {
        !self.killed.borrow().contains(&pid)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        self.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}
