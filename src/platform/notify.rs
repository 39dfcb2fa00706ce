//! Desktop notification delivery.

use std::process::Command;

use crate::core::system_monitor::{Notification, Notifier};
use crate::error::{MonitorError, Result};

/// Sends notifications through the freedesktop `notify-send` helper.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    program: String,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            program: "notify-send".to_string(),
        }
    }

    fn args(notification: &Notification) -> Vec<&str> {
        let (urgency, icon) = if notification.critical {
            ("critical", "dialog-warning")
        } else {
            ("normal", "dialog-information")
        };
        vec![
            "-u",
            urgency,
            "-i",
            icon,
            notification.title.as_str(),
            notification.body.as_str(),
        ]
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let output = Command::new(&self.program)
            .args(Self::args(notification))
            .output()
            .map_err(|e| MonitorError::notification(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(MonitorError::notification(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Drops every notification. Used when notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        log::debug!("Notification suppressed: {}", notification.title);
        Ok(())
    }
}
