//! Clipboard monitoring
//!
//! Polls the system clipboard on a dedicated thread and emits an event for
//! each genuine content change. Deduplication is hash based: a poll cycle
//! that sees the same content as the previous one emits nothing, so the
//! event stream carries changes, not samples.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arboard::Clipboard;
use blake3::Hasher;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use super::ClipboardEvent;

/// Default polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 150;

/// Shared latch that suppresses observation while held paused. The service
/// pauses it around its own clipboard writes so the monitor never reports a
/// self-initiated change.
#[derive(Clone, Default)]
pub struct PauseLatch(Arc<AtomicBool>);

impl PauseLatch {
    pub fn pause(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Polling clipboard watcher.
pub struct ClipboardMonitor {
    /// Whether the polling thread should keep running
    running: Arc<AtomicBool>,
    /// Observation suppression latch
    paused: PauseLatch,
    /// Hash of the last observed content
    last_hash: Arc<Mutex<String>>,
    /// Polling interval (milliseconds)
    poll_interval_ms: u64,
}

/// Control handle for a started monitor; stops and detaches on drop.
pub struct MonitorHandle {
    running: Arc<AtomicBool>,
    paused: PauseLatch,
    thread: Option<JoinHandle<()>>,
}

impl ClipboardMonitor {
    pub fn new(poll_interval_ms: u64) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            paused: PauseLatch::default(),
            last_hash: Arc::new(Mutex::new(String::new())),
            poll_interval_ms,
        }
    }

    /// Start the polling thread. Events are sent through `tx`; the thread
    /// exits when the handle is stopped or the receiver is dropped.
    pub fn start(self, tx: UnboundedSender<ClipboardEvent>) -> MonitorHandle {
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let paused = self.paused.clone();
        let last_hash = Arc::clone(&self.last_hash);
        let interval = self.poll_interval_ms;

        let thread = thread::spawn(move || {
            log::info!("clipboard monitor started ({}ms poll interval)", interval);

            while running.load(Ordering::SeqCst) {
                if paused.is_paused() {
                    thread::sleep(Duration::from_millis(interval));
                    continue;
                }

                // Create a fresh Clipboard each cycle so we always see the
                // latest data
                let mut clipboard = match Clipboard::new() {
                    Ok(cb) => cb,
                    Err(e) => {
                        log::error!("failed to open clipboard: {}", e);
                        thread::sleep(Duration::from_millis(interval));
                        continue;
                    }
                };

                if let Some(event) = read_change(&mut clipboard, &last_hash) {
                    if tx.send(event).is_err() {
                        log::debug!("clipboard event channel closed, monitor exiting");
                        break;
                    }
                }

                thread::sleep(Duration::from_millis(interval));
            }

            log::info!("clipboard monitor stopped");
        });

        MonitorHandle {
            running: self.running,
            paused: self.paused,
            thread: Some(thread),
        }
    }
}

impl Default for ClipboardMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS)
    }
}

impl MonitorHandle {
    /// Clone of the pause latch, for whoever performs clipboard writes.
    pub fn pause_latch(&self) -> PauseLatch {
        self.paused.clone()
    }

    /// Signal the polling thread to stop and wait for it to exit.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Read the clipboard and return an event if the content changed since the
/// previous cycle.
fn read_change(clipboard: &mut Clipboard, last_hash: &Mutex<String>) -> Option<ClipboardEvent> {
    let text = match clipboard.get_text() {
        Ok(text) => text,
        // ContentNotAvailable is the normal empty-clipboard case
        Err(arboard::Error::ContentNotAvailable) => String::new(),
        Err(e) => {
            log::debug!("clipboard read failed: {}", e);
            return None;
        }
    };
    classify_change(text, last_hash)
}

/// Dedup step: an event only for content that differs from the previous
/// cycle. An empty clipboard never produces an event; it also resets the
/// dedup hash so the same text copied again after a clear is reported as a
/// fresh change.
fn classify_change(text: String, last_hash: &Mutex<String>) -> Option<ClipboardEvent> {
    let mut last = last_hash.lock();
    if text.is_empty() {
        last.clear();
        return None;
    }

    let hash = content_hash(&text);
    if hash == *last {
        return None;
    }
    *last = hash;
    drop(last);

    log::debug!("clipboard change detected ({} bytes)", text.len());
    Some(ClipboardEvent { text })
}

fn content_hash(text: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(text.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_hashes_equal() {
        assert_eq!(content_hash("hello"), content_hash("hello"));
        assert_ne!(content_hash("hello"), content_hash("hello "));
    }

    #[test]
    fn repeated_content_emits_one_event() {
        let last = Mutex::new(String::new());
        assert!(classify_change("hello".into(), &last).is_some());
        assert!(classify_change("hello".into(), &last).is_none());
        assert!(classify_change("world".into(), &last).is_some());
    }

    #[test]
    fn empty_content_emits_nothing_and_resets_dedup() {
        let last = Mutex::new(String::new());
        assert!(classify_change("hello".into(), &last).is_some());
        // A clear (empty clipboard) is not an event...
        assert!(classify_change(String::new(), &last).is_none());
        // ...and the same text copied again afterwards is a fresh change.
        assert!(classify_change("hello".into(), &last).is_some());
    }

    #[test]
    fn handle_drop_clears_running_flag() {
        let monitor = ClipboardMonitor::new(10);
        let running = Arc::clone(&monitor.running);
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = monitor.start(tx);
        assert!(running.load(Ordering::SeqCst));
        drop(rx);
        drop(handle);
        assert!(!running.load(Ordering::SeqCst));
    }
}
