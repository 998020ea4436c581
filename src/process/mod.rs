//! Process liveness
//!
//! The monitor's liveness is an OS fact, distinct from the persisted
//! `started` flag (the daemon can die without flipping the flag). The check
//! scans the process table for a process matching the monitor identity, the
//! same way the host would; it is deliberately a capability trait so tests
//! and embedders can supply their own.

use sysinfo::{Signal, System};

/// Identity of the monitor process: executable name plus the argument that
/// marks the foreground monitor loop.
#[derive(Debug, Clone)]
pub struct ProcessIdentity {
    pub exe_name: String,
    pub run_arg: String,
}

impl ProcessIdentity {
    /// The monitor daemon of this installation.
    pub fn monitor() -> Self {
        Self {
            exe_name: "clipsweep".to_string(),
            run_arg: "run".to_string(),
        }
    }
}

/// Host capability: query and control live monitor processes.
pub trait ProcessRegistry {
    /// Whether a monitor process matching the identity is currently alive.
    fn is_running(&self, identity: &ProcessIdentity) -> bool;

    /// Terminate all monitor processes matching the identity. Returns how
    /// many were signalled.
    fn request_stop(&self, identity: &ProcessIdentity) -> usize;
}

/// Registry backed by the OS process table.
pub struct SystemProcessRegistry;

impl SystemProcessRegistry {
    fn matching_pids(&self, identity: &ProcessIdentity) -> Vec<sysinfo::Pid> {
        let own_pid = sysinfo::get_current_pid().ok();
        let mut sys = System::new();
        sys.refresh_processes();

        sys.processes()
            .iter()
            .filter(|(pid, process)| {
                Some(**pid) != own_pid
                    && process.name() == identity.exe_name
                    && process.cmd().iter().any(|arg| *arg == identity.run_arg)
            })
            .map(|(pid, _)| *pid)
            .collect()
    }
}

impl ProcessRegistry for SystemProcessRegistry {
    fn is_running(&self, identity: &ProcessIdentity) -> bool {
        !self.matching_pids(identity).is_empty()
    }

    fn request_stop(&self, identity: &ProcessIdentity) -> usize {
        let mut sys = System::new();
        sys.refresh_processes();
        let own_pid = sysinfo::get_current_pid().ok();

        let mut stopped = 0;
        for (pid, process) in sys.processes() {
            if Some(*pid) == own_pid {
                continue;
            }
            if process.name() != identity.exe_name {
                continue;
            }
            if !process.cmd().iter().any(|arg| *arg == identity.run_arg) {
                continue;
            }
            // Prefer a graceful terminate where the platform supports it
            let killed = process
                .kill_with(Signal::Term)
                .unwrap_or_else(|| process.kill());
            if killed {
                log::info!("terminated monitor process {}", pid);
                stopped += 1;
            } else {
                log::warn!("failed to terminate monitor process {}", pid);
            }
        }
        stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_process_is_not_a_monitor() {
        // The test binary is not named "clipsweep" and carries no "run"
        // argument, so the scan must come up empty.
        let registry = SystemProcessRegistry;
        assert!(!registry.is_running(&ProcessIdentity::monitor()));
    }
}
