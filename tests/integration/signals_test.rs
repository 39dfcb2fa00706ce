use std::process::{Child, Command};
use std::time::Duration;

use actmon::core::system_monitor::{
    ProcessRegistry, ProcessSignaller, RawProcess, TerminationSignal,
};
use actmon::platform::NixSignaller;
use actmon::MonitorError;

fn spawn(script: &str) -> Child {
    Command::new("sh")
        .args(["-c", script])
        .spawn()
        .unwrap()
}

fn registry_with(child: &Child) -> ProcessRegistry {
    let mut registry = ProcessRegistry::new(Duration::from_millis(100));
    registry.refresh(
        vec![RawProcess {
            pid: child.id(),
            name: "sh".to_string(),
            resident_kb: 1_000,
            cpu_ticks: 10,
        }],
        1_000_000,
        1,
    );
    registry
}

#[test]
fn test_terminate_child_process() {
    let mut child = spawn("exec sleep 30");
    let registry = registry_with(&child);

    let terminated = registry.terminate(child.id(), &NixSignaller::new()).unwrap();
    assert_eq!(terminated.pid, child.id());

    let status = child.wait().unwrap();
    assert!(!status.success());
}

#[test]
fn test_sigterm_ignoring_child_is_killed() {
    let mut child = spawn("trap '' TERM; exec sleep 30");
    let registry = registry_with(&child);

    // An unreaped child stays visible through the grace period either way
    let terminated = registry.terminate(child.id(), &NixSignaller::new()).unwrap();
    assert_eq!(terminated.signal, TerminationSignal::Forceful);

    child.wait().unwrap();
}

#[test]
fn test_unlisted_and_protected_pids() {
    let registry = ProcessRegistry::new(Duration::ZERO);
    let signaller = NixSignaller::new();

    assert!(matches!(
        registry.terminate(std::process::id(), &signaller),
        Err(MonitorError::ProtectedProcess(_))
    ));
    assert!(matches!(
        registry.terminate(0, &signaller),
        Err(MonitorError::ProtectedProcess(0))
    ));
    assert!(matches!(
        registry.terminate(4_190_999, &signaller),
        Err(MonitorError::ProcessNotFound(4_190_999))
    ));
    assert!(!signaller.is_alive(4_190_999));
}
