//! CLI command handlers
//!
//! Everything a user can do from the command line: toggle the service,
//! inspect its state, and adjust the two settings that drive it.

use std::process::{Command, Stdio};

use serde::Serialize;

use crate::config::{ServiceMode, SettingsStore};
use crate::process::{ProcessIdentity, ProcessRegistry};

/// Snapshot of service state for `status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// OS-level liveness of the monitor process
    pub running: bool,
    /// Persisted user intent; can diverge from `running` if the process
    /// was killed externally
    pub started: bool,
    pub mode: String,
    pub timeout_secs: u32,
}

/// Persist the started flag and spawn the monitor daemon, unless one is
/// already alive.
pub fn start(settings: &SettingsStore, registry: &dyn ProcessRegistry) -> std::io::Result<()> {
    settings.set_started(true);

    let identity = ProcessIdentity::monitor();
    if registry.is_running(&identity) {
        println!("clipsweep is already running");
        return Ok(());
    }

    let exe = std::env::current_exe()?;
    let child = Command::new(exe)
        .arg("run")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    log::info!("spawned monitor daemon (pid {})", child.id());
    println!("clipsweep started");
    Ok(())
}

/// Persist the stopped flag and terminate any live monitor daemon.
pub fn stop(settings: &SettingsStore, registry: &dyn ProcessRegistry) {
    settings.set_started(false);

    let stopped = registry.request_stop(&ProcessIdentity::monitor());
    if stopped > 0 {
        println!("clipsweep stopped");
    } else {
        println!("clipsweep was not running");
    }
}

/// Gather the current state.
pub fn status(settings: &SettingsStore, registry: &dyn ProcessRegistry) -> StatusReport {
    StatusReport {
        running: registry.is_running(&ProcessIdentity::monitor()),
        started: settings.started(),
        mode: settings.mode().as_str().to_string(),
        timeout_secs: settings.timeout_secs(),
    }
}

/// Print the status, human readable or as JSON.
pub fn print_status(report: &StatusReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(s) => println!("{}", s),
            Err(e) => log::error!("failed to serialize status: {}", e),
        }
        return;
    }

    println!(
        "monitor:  {}",
        if report.running { "running" } else { "not running" }
    );
    println!(
        "started:  {}",
        if report.started { "yes" } else { "no" }
    );
    println!("mode:     {}", report.mode);
    println!("timeout:  {}s", report.timeout_secs);
}

/// Get or set the reaction mode.
pub fn mode(settings: &SettingsStore, new_mode: Option<ServiceMode>) {
    match new_mode {
        Some(m) => {
            settings.set_mode(m);
            println!("mode set to {}", m.as_str());
        }
        None => println!("{}", settings.mode().as_str()),
    }
}

/// Get or set the clean timeout.
pub fn timeout(settings: &SettingsStore, new_secs: Option<u32>) {
    match new_secs {
        Some(secs) => {
            settings.set_timeout_secs(secs);
            println!("timeout set to {}s", secs);
        }
        None => println!("{}", settings.timeout_secs()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::Database;

    struct FakeRegistry {
        running: bool,
    }

    impl ProcessRegistry for FakeRegistry {
        fn is_running(&self, _identity: &ProcessIdentity) -> bool {
            self.running
        }

        fn request_stop(&self, _identity: &ProcessIdentity) -> usize {
            usize::from(self.running)
        }
    }

    fn store() -> SettingsStore {
        SettingsStore::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn start_persists_flag_even_when_already_running() {
        let settings = store();
        let registry = FakeRegistry { running: true };
        start(&settings, &registry).unwrap();
        assert!(settings.started());
    }

    #[test]
    fn stop_persists_flag_even_when_not_running() {
        let settings = store();
        settings.set_started(true);
        let registry = FakeRegistry { running: false };
        stop(&settings, &registry);
        assert!(!settings.started());
    }

    #[test]
    fn status_reflects_settings_and_registry() {
        let settings = store();
        settings.set_started(true);
        settings.set_mode(ServiceMode::ShowContent);
        settings.set_timeout_secs(7);

        let report = status(&settings, &FakeRegistry { running: false });
        assert!(!report.running);
        assert!(report.started);
        assert_eq!(report.mode, "show-content");
        assert_eq!(report.timeout_secs, 7);
    }

    #[test]
    fn status_serializes_to_json() {
        let settings = store();
        let report = status(&settings, &FakeRegistry { running: false });
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"mode\":\"clean\""));
    }

    #[test]
    fn mode_setter_persists() {
        let settings = store();
        mode(&settings, Some(ServiceMode::ShowContent));
        assert_eq!(settings.mode(), ServiceMode::ShowContent);
    }

    #[test]
    fn timeout_setter_persists() {
        let settings = store();
        timeout(&settings, Some(30));
        assert_eq!(settings.timeout_secs(), 30);
    }
}
