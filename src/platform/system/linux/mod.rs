// Linux /proc counter readers

pub mod cpu;
pub mod memory;
pub mod processes;
pub mod storage;

use std::fs;
use std::path::PathBuf;

use crate::core::system_monitor::{
    CounterSource, CpuTimeSnapshot, DiskIoSnapshot, MemorySnapshot, MountedFilesystem, RawProcess,
};
use crate::error::{MonitorError, Result};

/// Reads counters from a procfs tree. The root is `/proc` on a live system
/// and can point at a fixture directory in tests.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    root: PathBuf,
}

impl ProcfsSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Read a file as text. Mount paths and process names may hold
    /// arbitrary bytes, so invalid UTF-8 is replaced rather than rejected.
    fn read(&self, name: &str) -> Result<(String, String)> {
        let path = self.root.join(name);
        let display = path.display().to_string();
        let bytes =
            fs::read(&path).map_err(|e| MonitorError::source_unavailable(display.clone(), e))?;
        Ok((String::from_utf8_lossy(&bytes).into_owned(), display))
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl CounterSource for ProcfsSource {
    fn read_cpu_times(&self) -> Result<CpuTimeSnapshot> {
        let (content, path) = self.read("stat")?;
        cpu::parse_proc_stat(&content, &path)
    }

    fn read_memory(&self) -> Result<MemorySnapshot> {
        let (content, path) = self.read("meminfo")?;
        memory::parse_meminfo(&content, &path)
    }

    fn read_filesystems(&self) -> Result<Vec<MountedFilesystem>> {
        let (content, _) = self.read("mounts")?;
        Ok(storage::parse_mounts(&content)
            .iter()
            .filter_map(|mount| match storage::filesystem_space(mount) {
                Ok(fs) => Some(fs),
                Err(e) => {
                    log::debug!("Skipping {}: {}", mount.mount_point, e);
                    None
                }
            })
            .collect())
    }

    fn read_disk_io(&self) -> Result<Option<DiskIoSnapshot>> {
        match self.read("diskstats") {
            Ok((content, _)) => Ok(Some(storage::parse_diskstats(&content))),
            Err(e) => {
                log::debug!("Disk latency unavailable: {}", e);
                Ok(None)
            }
        }
    }

    fn read_processes(&self) -> Result<Vec<RawProcess>> {
        processes::scan_processes(&self.root)
    }
}
