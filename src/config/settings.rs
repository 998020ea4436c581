//! Service settings
//!
//! Two persisted flags drive the whole service: whether the user wants the
//! monitor active, and how it should react to clipboard changes. A third
//! value, the clean timeout, controls the delayed-clear debounce.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::Database;

const SETTING_SERVICE_STARTED: &str = "service_started";
const SETTING_SERVICE_MODE: &str = "service_mode";
const SETTING_CLEAN_TIMEOUT: &str = "clean_timeout_secs";

/// Default clean timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 0;

/// How the service reacts to a clipboard change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// Clear the clipboard, immediately or after the configured timeout.
    Clean = 0,
    /// Surface the clipboard content to the user; never clear.
    ShowContent = 1,
}

impl Default for ServiceMode {
    fn default() -> Self {
        ServiceMode::Clean
    }
}

impl ServiceMode {
    /// Persisted numeric value.
    pub fn as_i64(&self) -> i64 {
        *self as i64
    }

    /// Create from the persisted numeric value. Anything outside the two
    /// defined variants normalizes to `Clean`.
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => ServiceMode::ShowContent,
            _ => ServiceMode::Clean,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::Clean => "clean",
            ServiceMode::ShowContent => "show-content",
        }
    }
}

// Custom serialization: serialize as the persisted numeric value
impl Serialize for ServiceMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.as_i64())
    }
}

// Custom deserialization: out-of-range input normalizes rather than erroring
impl<'de> Deserialize<'de> for ServiceMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Ok(ServiceMode::from_i64(value))
    }
}

/// Settings store for the service, backed by the key/value database.
///
/// Cheap to clone; constructed once and injected wherever settings are read
/// or written.
#[derive(Clone)]
pub struct SettingsStore {
    db: Arc<Database>,
}

impl SettingsStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Whether the user has requested the monitor be active. This is the
    /// persisted intent, not a liveness check; the two can diverge if the
    /// monitor process was killed externally.
    pub fn started(&self) -> bool {
        self.db.get_bool(SETTING_SERVICE_STARTED, false)
    }

    pub fn set_started(&self, started: bool) {
        if let Err(e) = self.db.set_bool(SETTING_SERVICE_STARTED, started) {
            log::error!("failed to persist started flag: {}", e);
        }
    }

    /// Current reaction mode. Out-of-range persisted values read as `Clean`.
    pub fn mode(&self) -> ServiceMode {
        ServiceMode::from_i64(self.db.get_int(SETTING_SERVICE_MODE, 0))
    }

    /// Set the reaction mode. Out-of-range input is normalized to `Clean`
    /// rather than rejected.
    pub fn set_mode_raw(&self, value: i64) {
        self.set_mode(ServiceMode::from_i64(value));
    }

    pub fn set_mode(&self, mode: ServiceMode) {
        if let Err(e) = self.db.set_int(SETTING_SERVICE_MODE, mode.as_i64()) {
            log::error!("failed to persist service mode: {}", e);
        }
    }

    /// Delay in seconds before a scheduled clear fires. Zero means clear
    /// immediately. Negative persisted values read as zero.
    pub fn timeout_secs(&self) -> u32 {
        self.db
            .get_int(SETTING_CLEAN_TIMEOUT, DEFAULT_TIMEOUT_SECS as i64)
            .max(0) as u32
    }

    pub fn set_timeout_secs(&self, secs: u32) {
        if let Err(e) = self.db.set_int(SETTING_CLEAN_TIMEOUT, secs as i64) {
            log::error!("failed to persist clean timeout: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn defaults() {
        let s = store();
        assert!(!s.started());
        assert_eq!(s.mode(), ServiceMode::Clean);
        assert_eq!(s.timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn started_flag_roundtrips() {
        let s = store();
        s.set_started(true);
        assert!(s.started());
        s.set_started(false);
        assert!(!s.started());
    }

    #[test]
    fn mode_roundtrips() {
        let s = store();
        s.set_mode(ServiceMode::ShowContent);
        assert_eq!(s.mode(), ServiceMode::ShowContent);
        s.set_mode(ServiceMode::Clean);
        assert_eq!(s.mode(), ServiceMode::Clean);
    }

    #[test]
    fn out_of_range_mode_normalizes_to_clean() {
        let s = store();
        for raw in [-1, 2, 7, i64::MAX, i64::MIN] {
            s.set_mode_raw(raw);
            assert_eq!(s.mode(), ServiceMode::Clean, "raw value {}", raw);
        }
    }

    #[test]
    fn out_of_range_persisted_mode_reads_as_clean() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        // Simulate a foreign writer having stored a bogus value directly.
        db.set_int("service_mode", 42).unwrap();
        let s = SettingsStore::new(db);
        assert_eq!(s.mode(), ServiceMode::Clean);
    }

    #[test]
    fn negative_persisted_timeout_reads_as_zero() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.set_int("clean_timeout_secs", -5).unwrap();
        let s = SettingsStore::new(db);
        assert_eq!(s.timeout_secs(), 0);
    }

    #[test]
    fn mode_serde_normalizes() {
        let mode: ServiceMode = serde_json::from_str("9").unwrap();
        assert_eq!(mode, ServiceMode::Clean);
        let mode: ServiceMode = serde_json::from_str("1").unwrap();
        assert_eq!(mode, ServiceMode::ShowContent);
        assert_eq!(serde_json::to_string(&ServiceMode::ShowContent).unwrap(), "1");
    }
}
