use std::time::Instant;

use super::alerts::{AlertLevel, AlertStateMachine};
use super::engine::{compute_memory, MetricsEngine};
use super::metrics::{ProcessEntry, SystemMetrics};
use super::notifications::{build_notification, NotificationThrottler, Notifier};
use super::process_registry::{ProcessRegistry, ProcessSignaller, Terminated};
use super::snapshot::CounterSource;
use crate::core::config::MonitorConfig;
use crate::error::Result;
use crate::platform::{DesktopNotifier, NixSignaller, NullNotifier, ProcfsSource};

/// Owns every piece of sampling state and runs one cycle at a time.
///
/// The rendering layer gets read-only access to the derived metrics and the
/// process list, and calls back in for sorting, scrolling and termination.
pub struct SamplingEngine {
    source: Box<dyn CounterSource>,
    notifier: Box<dyn Notifier>,
    signaller: Box<dyn ProcessSignaller>,
    engine: MetricsEngine,
    processes: ProcessRegistry,
    alerts: AlertStateMachine,
    throttler: NotificationThrottler,
    config: MonitorConfig,
    metrics: SystemMetrics,
    last_sample: Option<Instant>,
    show_alert: bool,
}

impl SamplingEngine {
    pub fn new(
        config: MonitorConfig,
        source: Box<dyn CounterSource>,
        notifier: Box<dyn Notifier>,
        signaller: Box<dyn ProcessSignaller>,
    ) -> Self {
        Self {
            source,
            notifier,
            signaller,
            engine: MetricsEngine::new(),
            processes: ProcessRegistry::new(config.kill_grace()),
            alerts: AlertStateMachine::new(config.cpu_threshold),
            throttler: NotificationThrottler::new(config.notification_cooldown()),
            show_alert: config.alerts_enabled,
            config,
            metrics: SystemMetrics::default(),
            last_sample: None,
        }
    }

    /// Engine wired to `/proc`, `kill(2)` and desktop notifications.
    pub fn for_live_system(config: MonitorConfig) -> Self {
        let source = Box::new(ProcfsSource::new(config.proc_root.clone()));
        let notifier: Box<dyn Notifier> = if config.notifications_enabled {
            Box::new(DesktopNotifier::new())
        } else {
            Box::new(NullNotifier)
        };
        Self::new(config, source, notifier, Box::new(NixSignaller::new()))
    }

    /// Run one sampling cycle.
    pub fn sample(&mut self) -> Result<&SystemMetrics> {
        self.sample_at(Instant::now())
    }

    /// Run one sampling cycle at an explicit instant.
    ///
    /// CPU and memory read failures are returned; everything else degrades
    /// to an empty or unavailable metric and the cycle continues.
    pub fn sample_at(&mut self, now: Instant) -> Result<&SystemMetrics> {
        let cpu_times = self.source.read_cpu_times()?;
        let memory = compute_memory(&self.source.read_memory()?);
        let cpu = self.engine.update_cpu(cpu_times).clone();

        let filesystems = self.source.read_filesystems().unwrap_or_else(|e| {
            log::warn!("Failed to read mounted filesystems: {}", e);
            Vec::new()
        });
        let disk_io = self.source.read_disk_io().unwrap_or_else(|e| {
            log::warn!("Failed to read disk counters: {}", e);
            None
        });
        let disks = self.engine.update_disks(&filesystems, disk_io);

        self.metrics = SystemMetrics {
            timestamp: chrono::Utc::now().timestamp(),
            elapsed_ms: self
                .last_sample
                .map(|prev| now.saturating_duration_since(prev).as_millis() as u64),
            cpu,
            memory,
            disks,
            alert_level: AlertLevel::Normal,
        };
        self.last_sample = Some(now);

        self.refresh_processes();

        let transition = self.alerts.update(&self.metrics.cpu);
        if transition.changed() {
            log::info!(
                "CPU alert level {:?} -> {:?} at {:.1}%",
                transition.previous,
                transition.current,
                self.metrics.cpu.total_usage
            );
        }
        self.metrics.alert_level = transition.current;

        if self.config.notifications_enabled {
            self.maybe_notify(transition.current, now);
        }

        Ok(&self.metrics)
    }

    fn maybe_notify(&mut self, level: AlertLevel, now: Instant) {
        let Some(level) = self.throttler.observe(level, now) else {
            return;
        };

        let notification = build_notification(
            level,
            self.metrics.cpu.total_usage,
            self.alerts.threshold(),
            self.processes.top_cpu_consumer(),
        );

        if let Some(notification) = notification {
            if let Err(e) = self.notifier.notify(&notification) {
                log::debug!("Desktop notification not delivered: {}", e);
            }
        }
    }

    /// Re-read the process table. A failed scan keeps an empty list.
    pub fn refresh_processes(&mut self) {
        let raw = self.source.read_processes().unwrap_or_else(|e| {
            log::warn!("Failed to read process table: {}", e);
            Vec::new()
        });
        self.processes.refresh(
            raw,
            self.metrics.memory.total_kb,
            self.metrics.cpu.core_count,
        );
    }

    /// Terminate a listed process, then refresh the list so the next render
    /// reflects the result.
    pub fn terminate(&mut self, pid: u32) -> Result<Terminated> {
        let terminated = self.processes.terminate(pid, self.signaller.as_ref())?;
        self.refresh_processes();
        Ok(terminated)
    }

    /// The "kill worst offender" target. Switches the list to CPU order.
    pub fn highest_cpu(&mut self) -> Option<ProcessEntry> {
        self.processes.highest_cpu()
    }

    pub fn metrics(&self) -> &SystemMetrics {
        &self.metrics
    }

    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    pub fn processes_mut(&mut self) -> &mut ProcessRegistry {
        &mut self.processes
    }

    pub fn alert_level(&self) -> AlertLevel {
        self.alerts.level()
    }

    pub fn threshold(&self) -> f32 {
        self.alerts.threshold()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Whether the visual alert panel should be drawn this frame.
    pub fn alert_visible(&self) -> bool {
        self.show_alert && self.alerts.level().is_alerting()
    }

    pub fn toggle_alerts(&mut self) -> bool {
        self.show_alert = !self.show_alert;
        self.show_alert
    }
}
