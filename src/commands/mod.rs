//! CLI commands

pub mod handlers;

pub use handlers::{mode, print_status, start, status, stop, timeout, StatusReport};
