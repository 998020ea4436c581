//! Service configuration

pub mod settings;

pub use settings::{ServiceMode, SettingsStore, DEFAULT_TIMEOUT_SECS};
