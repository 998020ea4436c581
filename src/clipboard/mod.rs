//! Clipboard access
//!
//! The monitor owns the read side (polling watcher); the write side sits
//! behind [`ClipboardWriter`] so the reaction logic can be exercised with a
//! fake clipboard in tests.

pub mod monitor;

pub use monitor::{ClipboardMonitor, MonitorHandle, PauseLatch};

/// A change observed on the system clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEvent {
    /// The clipboard text at the time of the change. Never empty; empty
    /// clipboards produce no event.
    pub text: String,
}

/// Write side of the clipboard.
pub trait ClipboardWriter: Send {
    /// Replace the clipboard content with the given text.
    fn set_text(&mut self, text: &str) -> Result<(), arboard::Error>;

    /// Remove the current clipboard content.
    fn clear(&mut self) -> Result<(), arboard::Error>;
}

/// The real system clipboard via arboard.
///
/// A fresh `arboard::Clipboard` is created per operation; on some platforms
/// a long-lived handle can hold the clipboard open.
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), arboard::Error> {
        arboard::Clipboard::new()?.set_text(text)
    }

    fn clear(&mut self) -> Result<(), arboard::Error> {
        arboard::Clipboard::new()?.clear()
    }
}
