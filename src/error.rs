use thiserror::Error;

/// Error type for the activity monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A required OS data source could not be opened or read.
    #[error("Source unavailable: {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// A line or record from an OS source is malformed.
    #[error("Malformed record in {path}: {detail}")]
    ParseAnomaly { path: String, detail: String },

    #[error("Failed to send {signal} to PID {pid}: {reason}")]
    SignalDeliveryFailed {
        pid: u32,
        signal: String,
        reason: String,
    },

    #[error("Process {0} is not in the current process list")]
    ProcessNotFound(u32),

    #[error("Refusing to signal protected PID {0}")]
    ProtectedProcess(u32),

    #[error("Notification error: {0}")]
    Notification(String),
}

/// Result type alias for the activity monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    pub fn source_unavailable<P: Into<String>, R: ToString>(path: P, reason: R) -> Self {
        MonitorError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse_anomaly<P: Into<String>, D: Into<String>>(path: P, detail: D) -> Self {
        MonitorError::ParseAnomaly {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn signal_delivery_failed<S: Into<String>, R: ToString>(
        pid: u32,
        signal: S,
        reason: R,
    ) -> Self {
        MonitorError::SignalDeliveryFailed {
            pid,
            signal: signal.into(),
            reason: reason.to_string(),
        }
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        MonitorError::Notification(msg.into())
    }
}
