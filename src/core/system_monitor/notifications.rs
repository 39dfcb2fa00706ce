//! Desktop notification policy.
//!
//! The visual alert panel may redraw every cycle; desktop notifications are
//! throttled so that a sustained alert produces one notification per cooldown.

use std::time::{Duration, Instant};

use super::alerts::AlertLevel;
use super::metrics::ProcessEntry;
use crate::error::Result;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub critical: bool,
}

/// The opaque "send notification" capability.
///
/// Delivery is best effort: callers log and ignore errors.
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Decides when a level change or a sustained alert should notify.
#[derive(Debug, Clone)]
pub struct NotificationThrottler {
    cooldown: Duration,
    last_level: AlertLevel,
    last_fired_at: Option<Instant>,
}

impl NotificationThrottler {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_level: AlertLevel::Normal,
            last_fired_at: None,
        }
    }

    pub fn last_level(&self) -> AlertLevel {
        self.last_level
    }

    pub fn last_fired_at(&self) -> Option<Instant> {
        self.last_fired_at
    }

    /// Observe this cycle's level. Returns the level to notify about, if any.
    ///
    /// A level change always fires; staying in a non-Normal level fires again
    /// once the cooldown has elapsed. Returning to Normal is recorded as a
    /// firing but never produces a notification.
    pub fn observe(&mut self, level: AlertLevel, now: Instant) -> Option<AlertLevel> {
        let changed = level != self.last_level;
        let cooled_down = match self.last_fired_at {
            Some(at) => now.saturating_duration_since(at) >= self.cooldown,
            None => true,
        };

        if !changed && !(level.is_alerting() && cooled_down) {
            return None;
        }

        self.last_level = level;
        self.last_fired_at = Some(now);

        level.is_alerting().then_some(level)
    }
}

impl Default for NotificationThrottler {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

/// Build the notification text for an alerting level.
pub fn build_notification(
    level: AlertLevel,
    usage: f32,
    threshold: f32,
    top: Option<&ProcessEntry>,
) -> Option<Notification> {
    let top_line = top.map(|p| {
        format!(
            "Highest CPU process: {} ({}) using {:.1}% CPU",
            p.pid, p.name, p.cpu_percent
        )
    });

    match level {
        AlertLevel::Normal => None,
        AlertLevel::Warning => {
            let body = match top_line {
                Some(line) => format!(
                    "{}\n\nPress 'k' in the activity monitor to terminate this process.",
                    line
                ),
                None => "No specific process identified as the main consumer.".to_string(),
            };
            Some(Notification {
                title: format!(
                    "CPU Usage Critical: {:.1}% (Threshold: {:.1}%)",
                    usage, threshold
                ),
                body,
                critical: true,
            })
        }
        AlertLevel::PreWarning => {
            let mut body = "CPU utilization is approaching threshold!".to_string();
            if let Some(line) = top_line {
                body.push('\n');
                body.push_str(&line);
            }
            Some(Notification {
                title: format!(
                    "CPU Usage Warning: {:.1}% (Threshold: {:.1}%)",
                    usage, threshold
                ),
                body,
                critical: false,
            })
        }
    }
}
