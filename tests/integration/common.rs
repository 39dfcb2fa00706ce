use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const MEMINFO: &str = "\
MemTotal:        1000000 kB
MemFree:          100000 kB
MemAvailable:     250000 kB
Buffers:           20000 kB
Cached:           180000 kB
SwapCached:            0 kB
SwapTotal:        500000 kB
SwapFree:         400000 kB
";

/// Only pseudo filesystems, so no statvfs call touches the host
pub const MOUNTS: &str = "\
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev 0 0
";

/// `/proc/stat` with an aggregate line and two cores sharing the load
pub fn stat(busy: u64, idle: u64) -> String {
    format!(
        "cpu  {b} 0 0 {i} 0 0 0 0 0 0\ncpu0 {hb} 0 0 {hi} 0 0 0 0 0 0\ncpu1 {hb} 0 0 {hi} 0 0 0 0 0 0\nintr 12345\nctxt 999\n",
        b = busy,
        i = idle,
        hb = busy / 2,
        hi = idle / 2
    )
}

pub fn write_process(root: &Path, pid: u32, name: &str, rss_kb: u64, utime: u64, stime: u64) {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("status"),
        format!("Name:\t{}\nState:\tS (sleeping)\nVmRSS:\t{} kB\n", name, rss_kb),
    )
    .unwrap();
    fs::write(
        dir.join("stat"),
        format!(
            "{} ({}) S 1 {} {} 0 -1 4194560 100 0 0 0 {} {} 0 0 20 0 1 0 500 0 0",
            pid, name, pid, pid, utime, stime
        ),
    )
    .unwrap();
}

/// A minimal procfs tree: stat, meminfo, mounts and two processes
pub fn fake_proc() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("stat"), stat(0, 0)).unwrap();
    fs::write(root.path().join("meminfo"), MEMINFO).unwrap();
    fs::write(root.path().join("mounts"), MOUNTS).unwrap();
    write_process(root.path(), 4_190_101, "compiler", 50_000, 1_500, 500);
    write_process(root.path(), 4_190_102, "database", 400_000, 100, 100);
    root
}
