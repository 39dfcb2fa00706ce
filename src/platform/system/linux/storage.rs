use std::path::Path;

use nix::sys::statvfs::statvfs;

use crate::core::system_monitor::{DiskIoCounters, DiskIoSnapshot, MountedFilesystem};
use crate::error::{MonitorError, Result};

/// Pseudo filesystems with no backing device
const VIRTUAL_FS_TYPES: &[&str] = &["proc", "sysfs", "devpts", "tmpfs", "devtmpfs", "debugfs"];

/// Mount trees reserved for the kernel and runtime state
const RESERVED_MOUNT_PREFIXES: &[&str] = &["/sys", "/proc", "/dev", "/run"];

/// One line of the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

/// Whether a mount should appear in the disk list.
pub fn is_monitored_filesystem(fs_type: &str, mount_point: &str) -> bool {
    if VIRTUAL_FS_TYPES.contains(&fs_type) {
        return false;
    }

    !RESERVED_MOUNT_PREFIXES.iter().any(|prefix| {
        mount_point == *prefix
            || mount_point
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Parse `/proc/mounts`, keeping only monitored filesystems.
pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let device = parts.next()?;
            let mount_point = unescape_mount_field(parts.next()?);
            let fs_type = parts.next()?;
            Some(MountEntry {
                device: device.to_string(),
                mount_point,
                fs_type: fs_type.to_string(),
            })
        })
        .filter(|m| is_monitored_filesystem(&m.fs_type, &m.mount_point))
        .collect()
}

/// Decode the octal escapes (`\040` for space etc.) used in the mount table.
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let value = digits.iter().fold(0u16, |acc, d| acc * 8 + (d - b'0') as u16);
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Query space usage for a mount.
pub fn filesystem_space(mount: &MountEntry) -> Result<MountedFilesystem> {
    let stat = statvfs(Path::new(&mount.mount_point))
        .map_err(|e| MonitorError::source_unavailable(mount.mount_point.clone(), e))?;

    let block_size = stat.fragment_size() as u64;
    let total_kb = (stat.blocks() as u64).saturating_mul(block_size) / 1024;
    let free_kb = (stat.blocks_free() as u64).saturating_mul(block_size) / 1024;

    Ok(MountedFilesystem {
        device: mount.device.clone(),
        mount_point: mount.mount_point.clone(),
        fs_type: mount.fs_type.clone(),
        total_kb,
        free_kb,
    })
}

/// Parse `/proc/diskstats` into counters keyed by device name.
pub fn parse_diskstats(content: &str) -> DiskIoSnapshot {
    content
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 8 {
                log::debug!("Skipping diskstats line: {:?}", line);
                return None;
            }
            let counter = |i: usize| parts[i].parse::<u64>().ok();
            Some((
                parts[2].to_string(),
                DiskIoCounters {
                    reads_completed: counter(3)?,
                    read_time_ms: counter(6)?,
                    writes_completed: counter(7)?,
                },
            ))
        })
        .collect()
}
