use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;
pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;
pub const DEFAULT_CPU_THRESHOLD: f32 = 80.0;
pub const DEFAULT_DEBUG_CYCLES: u32 = 10;
pub const DEFAULT_KILL_GRACE_MS: u64 = 250;
pub const DEFAULT_NOTIFICATION_COOLDOWN_SECS: u64 = 60;

/// Runtime configuration for the monitor.
///
/// Values are layered: built-in defaults, then the optional JSON config file,
/// then command-line flags. Call [`MonitorConfig::validated`] after layering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub refresh_interval_ms: u64,
    /// CPU threshold for alerts (%)
    pub cpu_threshold: f32,
    /// Show the visual alert panel
    pub alerts_enabled: bool,
    /// Send desktop notifications
    pub notifications_enabled: bool,
    pub debug_mode: bool,
    /// Run headless for `debug_cycles` cycles, logging instead of rendering
    pub debug_only_mode: bool,
    pub debug_cycles: u32,
    /// Emit one JSON object per cycle in debug-only mode
    pub json_output: bool,
    /// How long a SIGTERM'd process gets before SIGKILL
    pub kill_grace_ms: u64,
    pub notification_cooldown_secs: u64,
    pub proc_root: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            cpu_threshold: DEFAULT_CPU_THRESHOLD,
            alerts_enabled: true,
            notifications_enabled: true,
            debug_mode: false,
            debug_only_mode: false,
            debug_cycles: DEFAULT_DEBUG_CYCLES,
            json_output: false,
            kill_grace_ms: DEFAULT_KILL_GRACE_MS,
            notification_cooldown_secs: DEFAULT_NOTIFICATION_COOLDOWN_SECS,
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl MonitorConfig {
    /// Load the default config file if it exists, otherwise return defaults.
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load an explicit config file. A missing or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("actmon").join("config.json"))
    }

    /// Clamp out-of-range values, returning the fixed config and a warning
    /// for every value that had to change.
    pub fn validated(mut self) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        if self.refresh_interval_ms < MIN_REFRESH_INTERVAL_MS {
            warnings.push(format!(
                "Refresh rate too low. Setting to {}ms minimum.",
                MIN_REFRESH_INTERVAL_MS
            ));
            self.refresh_interval_ms = MIN_REFRESH_INTERVAL_MS;
        }

        if !(0.0..=100.0).contains(&self.cpu_threshold) {
            warnings.push(format!(
                "Threshold must be between 0 and 100. Using default of {:.0}%.",
                DEFAULT_CPU_THRESHOLD
            ));
            self.cpu_threshold = DEFAULT_CPU_THRESHOLD;
        }

        if self.debug_only_mode {
            self.debug_mode = true;
        }

        (self, warnings)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }

    pub fn notification_cooldown(&self) -> Duration {
        Duration::from_secs(self.notification_cooldown_secs)
    }
}
