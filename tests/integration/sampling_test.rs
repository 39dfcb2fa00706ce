use std::fs;
use std::time::{Duration, Instant};

use actmon::core::system_monitor::{
    AlertLevel, ProcessSignaller, SamplingEngine, SignalError, SortKey, TerminationSignal,
};
use actmon::platform::{NullNotifier, ProcfsSource};
use actmon::MonitorConfig;

use super::common::{fake_proc, stat};

/// Refuses every signal; integration tests never signal real processes here
struct DenySignaller;

impl ProcessSignaller for DenySignaller {
    fn send(&self, _pid: u32, _signal: TerminationSignal) -> Result<(), SignalError> {
        Err(SignalError::PermissionDenied)
    }

    fn is_alive(&self, _pid: u32) -> bool {
        true
    }
}

fn engine_for(root: &std::path::Path) -> SamplingEngine {
    let config = MonitorConfig {
        proc_root: root.to_path_buf(),
        notifications_enabled: false,
        ..MonitorConfig::default()
    };
    SamplingEngine::new(
        config,
        Box::new(ProcfsSource::new(root)),
        Box::new(NullNotifier),
        Box::new(DenySignaller),
    )
}

#[test]
fn test_two_cycles_over_fake_proc() {
    let root = fake_proc();
    let mut engine = engine_for(root.path());
    let t0 = Instant::now();

    let first = engine.sample_at(t0).unwrap();
    assert!(!first.cpu.ready);
    assert_eq!(first.alert_level, AlertLevel::Normal);
    assert_eq!(first.memory.used_kb, 750_000);
    assert_eq!(first.memory.usage_percent, 75.0);
    assert!(first.disks.is_empty());

    // 70 of 100 ticks busy: above 0.8 * 80 = 64
    fs::write(root.path().join("stat"), stat(70, 30)).unwrap();
    let second = engine.sample_at(t0 + Duration::from_secs(1)).unwrap();
    assert!(second.cpu.ready);
    assert!((second.cpu.total_usage - 70.0).abs() < 1e-3);
    assert_eq!(second.cpu.per_core_usage.len(), 2);
    assert_eq!(second.alert_level, AlertLevel::PreWarning);
}

#[test]
fn test_regressed_counters_keep_previous_usage() {
    let root = fake_proc();
    let mut engine = engine_for(root.path());

    engine.sample().unwrap();
    fs::write(root.path().join("stat"), stat(90, 10)).unwrap();
    engine.sample().unwrap();

    // Counters reset, e.g. after a hotplug
    fs::write(root.path().join("stat"), stat(10, 5)).unwrap();
    let metrics = engine.sample().unwrap();
    assert!((metrics.cpu.total_usage - 90.0).abs() < 1e-3);
    assert_eq!(metrics.alert_level, AlertLevel::Warning);
}

#[test]
fn test_process_list_and_sorting() {
    let root = fake_proc();
    let mut engine = engine_for(root.path());
    engine.sample().unwrap();

    let registry = engine.processes();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.entries()[0].name, "compiler");
    // 2000 ticks / (1000 * 2 cores)
    assert_eq!(registry.entries()[0].cpu_percent, 1.0);
    assert_eq!(registry.entries()[1].memory_percent, 40.0);

    engine.processes_mut().set_sort_key(SortKey::Memory);
    assert_eq!(engine.processes().entries()[0].name, "database");
}

#[test]
fn test_failed_termination_leaves_list_intact() {
    let root = fake_proc();
    let mut engine = engine_for(root.path());
    engine.sample().unwrap();

    let top = engine.highest_cpu().unwrap();
    assert!(engine.terminate(top.pid).is_err());
    assert!(engine.terminate(1).is_err());
    assert_eq!(engine.processes().len(), 2);
}

#[test]
fn test_vanished_process_is_skipped() {
    let root = fake_proc();
    let mut engine = engine_for(root.path());
    engine.sample().unwrap();

    fs::remove_dir_all(root.path().join("4190102")).unwrap();
    engine.refresh_processes();
    assert_eq!(engine.processes().len(), 1);
}
