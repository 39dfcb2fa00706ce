//! CPU alert levels.
//!
//! The level is re-derived from current usage every cycle. The only history
//! kept is the previously emitted level, used to report edge transitions.

use serde::{Deserialize, Serialize};

use super::metrics::CpuMetrics;

/// Fraction of the threshold at which the pre-warning level begins
pub const PRE_WARNING_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    #[default]
    Normal,
    PreWarning,
    Warning,
}

impl AlertLevel {
    pub fn is_alerting(self) -> bool {
        self != AlertLevel::Normal
    }
}

/// Classify a CPU usage against the threshold.
///
/// `usage >= threshold` is Warning, `usage >= 0.8 * threshold` is PreWarning.
pub fn classify(usage: f32, threshold: f32) -> AlertLevel {
    let usage = usage as f64;
    let threshold = threshold as f64;

    if usage >= threshold {
        AlertLevel::Warning
    } else if usage >= threshold * PRE_WARNING_RATIO {
        AlertLevel::PreWarning
    } else {
        AlertLevel::Normal
    }
}

/// A level observed in one cycle, with the level of the cycle before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertTransition {
    pub previous: AlertLevel,
    pub current: AlertLevel,
}

impl AlertTransition {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug, Clone)]
pub struct AlertStateMachine {
    threshold: f32,
    last: AlertLevel,
}

impl AlertStateMachine {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last: AlertLevel::Normal,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn level(&self) -> AlertLevel {
        self.last
    }

    /// Derive this cycle's level. CPU metrics that are not ready yet count
    /// as Normal so the first sample can never raise an alert.
    pub fn update(&mut self, cpu: &CpuMetrics) -> AlertTransition {
        let current = if cpu.ready {
            classify(cpu.total_usage, self.threshold)
        } else {
            AlertLevel::Normal
        };

        let transition = AlertTransition {
            previous: self.last,
            current,
        };
        self.last = current;
        transition
    }
}
