//! Process signalling through `kill(2)`.

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use crate::core::system_monitor::{ProcessSignaller, SignalError, TerminationSignal};

#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

impl NixSignaller {
    pub fn new() -> Self {
        Self
    }
}

fn to_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid).ok().map(Pid::from_raw)
}

impl From<Errno> for SignalError {
    fn from(errno: Errno) -> Self {
        match errno {
            Errno::ESRCH => SignalError::NoSuchProcess,
            Errno::EPERM => SignalError::PermissionDenied,
            other => SignalError::Other(other.desc().to_string()),
        }
    }
}

impl ProcessSignaller for NixSignaller {
    fn send(&self, pid: u32, signal: TerminationSignal) -> Result<(), SignalError> {
        let pid = to_pid(pid).ok_or(SignalError::NoSuchProcess)?;
        let signal = match signal {
            TerminationSignal::Graceful => Signal::SIGTERM,
            TerminationSignal::Forceful => Signal::SIGKILL,
        };
        signal::kill(pid, signal).map_err(SignalError::from)
    }

    fn is_alive(&self, pid: u32) -> bool {
        let Some(pid) = to_pid(pid) else {
            return false;
        };
        // Signal 0 probes existence; EPERM still means the process exists
        match signal::kill(pid, None) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(SignalError::from(Errno::ESRCH), SignalError::NoSuchProcess);
        assert_eq!(SignalError::from(Errno::EPERM), SignalError::PermissionDenied);
        assert!(matches!(SignalError::from(Errno::EINVAL), SignalError::Other(_)));
    }

    #[test]
    fn test_own_process_is_alive() {
        assert!(NixSignaller::new().is_alive(std::process::id()));
    }

    #[test]
    fn test_out_of_range_pid() {
        let signaller = NixSignaller::new();
        assert!(!signaller.is_alive(u32::MAX));
        assert_eq!(
            signaller.send(u32::MAX, TerminationSignal::Graceful),
            Err(SignalError::NoSuchProcess)
        );
    }
}
