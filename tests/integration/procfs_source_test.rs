use std::fs;

use actmon::core::system_monitor::CounterSource;
use actmon::platform::ProcfsSource;
use actmon::MonitorError;

use super::common::{fake_proc, MEMINFO};

#[test]
fn test_reads_cpu_and_memory() {
    let root = fake_proc();
    let source = ProcfsSource::new(root.path());

    let cpu = source.read_cpu_times().unwrap();
    assert_eq!(cpu.core_count(), 2);

    let memory = source.read_memory().unwrap();
    assert_eq!(memory.total_kb, 1_000_000);
    assert_eq!(memory.available_kb, 250_000);
    assert_eq!(memory.swap_total_kb, 500_000);
    assert_eq!(memory.cached_kb, 180_000);
}

#[test]
fn test_missing_stat_is_source_unavailable() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("meminfo"), MEMINFO).unwrap();
    let source = ProcfsSource::new(root.path());

    assert!(matches!(
        source.read_cpu_times(),
        Err(MonitorError::SourceUnavailable { .. })
    ));
}

#[test]
fn test_pseudo_filesystems_are_not_listed() {
    let root = fake_proc();
    let source = ProcfsSource::new(root.path());
    assert!(source.read_filesystems().unwrap().is_empty());
}

#[test]
fn test_missing_diskstats_is_soft() {
    let root = fake_proc();
    let source = ProcfsSource::new(root.path());
    assert_eq!(source.read_disk_io().unwrap(), None);

    fs::write(
        root.path().join("diskstats"),
        "   8       0 sda 100 0 800 50 10 0 80 5 0 60 55\n",
    )
    .unwrap();
    let io = source.read_disk_io().unwrap().unwrap();
    assert_eq!(io["sda"].reads_completed, 100);
}

#[test]
fn test_process_scan() {
    let root = fake_proc();
    let source = ProcfsSource::new(root.path());

    let mut processes = source.read_processes().unwrap();
    processes.sort_by_key(|p| p.pid);

    assert_eq!(processes.len(), 2);
    assert_eq!(processes[0].name, "compiler");
    assert_eq!(processes[0].cpu_ticks, 2_000);
    assert_eq!(processes[1].resident_kb, 400_000);
}

#[test]
fn test_process_with_non_utf8_name_is_listed() {
    let root = fake_proc();
    let dir = root.path().join("4190103");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("status"),
        b"Name:\tbad\xff\xfename\nState:\tR (running)\nVmRSS:\t  1024 kB\n".as_slice(),
    )
    .unwrap();
    fs::write(
        dir.join("stat"),
        b"4190103 (bad\xff\xfename) R 1 4190103 4190103 0 -1 4194560 100 0 0 0 9000 1000 0 0 20 0 1 0 500 0 0"
            .as_slice(),
    )
    .unwrap();
    let source = ProcfsSource::new(root.path());

    let processes = source.read_processes().unwrap();
    let odd = processes.iter().find(|p| p.pid == 4_190_103).unwrap();

    assert_eq!(processes.len(), 3);
    assert_eq!(odd.name, "bad\u{FFFD}\u{FFFD}name");
    assert_eq!(odd.cpu_ticks, 10_000);
    assert_eq!(odd.resident_kb, 1024);
}

#[test]
fn test_non_utf8_mount_line_keeps_other_disks() {
    let root = fake_proc();
    let data = tempfile::tempdir().unwrap();
    let data_path = data.path().display().to_string();

    let mut mounts = b"/dev/sdb1 /media/caf\xe9 ext4 rw 0 0\n".to_vec();
    mounts.extend_from_slice(format!("/dev/sda1 {} ext4 rw 0 0\n", data_path).as_bytes());
    fs::write(root.path().join("mounts"), mounts).unwrap();
    let source = ProcfsSource::new(root.path());

    let disks = source.read_filesystems().unwrap();

    assert_eq!(disks.len(), 1);
    assert_eq!(disks[0].device, "/dev/sda1");
    assert_eq!(disks[0].mount_point, data_path);
}
