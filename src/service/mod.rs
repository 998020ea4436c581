//! The clean service
//!
//! One async task consumes clipboard-change events and reacts according to
//! the configured mode: clear the clipboard (immediately or after a
//! debounced delay) or surface the content to the user. Events and the
//! delayed-clear deadline are multiplexed on a single `select` loop, so no
//! two reactions ever run concurrently and cancelling the pending clear is
//! just dropping the deadline.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, Instant};

use crate::clipboard::{ClipboardEvent, ClipboardWriter, PauseLatch};
use crate::config::{ServiceMode, SettingsStore};
use crate::notify::Presenter;

/// Reaction engine for clipboard changes.
pub struct CleanService<W: ClipboardWriter, P: Presenter> {
    settings: SettingsStore,
    clipboard: W,
    presenter: P,
    /// Suppresses the monitor while the service writes to the clipboard.
    pause_latch: Option<PauseLatch>,
    /// The single pending-clear slot. `Some` means exactly one clear is
    /// scheduled; scheduling always replaces the previous value.
    deadline: Option<Instant>,
}

impl<W: ClipboardWriter, P: Presenter> CleanService<W, P> {
    pub fn new(settings: SettingsStore, clipboard: W, presenter: P) -> Self {
        Self {
            settings,
            clipboard,
            presenter,
            pause_latch: None,
            deadline: None,
        }
    }

    pub fn with_pause_latch(mut self, latch: PauseLatch) -> Self {
        self.pause_latch = Some(latch);
        self
    }

    /// Run until the event channel closes. Closing the channel is the stop
    /// request; any pending clear dies with the loop and never fires.
    pub async fn run(mut self, mut events: UnboundedReceiver<ClipboardEvent>) {
        self.presenter.persistent_status("watching the clipboard");
        self.presenter.transient_message("service started");

        loop {
            // The arm is disabled while no clear is pending; the fallback
            // instant is never polled.
            let deadline = self.deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                maybe_event = events.recv() => match maybe_event {
                    Some(event) => self.on_clipboard_change(&event.text),
                    None => break,
                },
                _ = time::sleep_until(deadline), if self.deadline.is_some() => {
                    self.deadline = None;
                    self.clear_clipboard();
                }
            }
        }

        self.deadline = None;
        self.presenter.transient_message("service stopped");
    }

    /// React to one clipboard change.
    fn on_clipboard_change(&mut self, text: &str) {
        // Nothing to act on; also keeps the service's own clear from
        // feeding back into the reaction path.
        if text.is_empty() {
            return;
        }

        match self.settings.mode() {
            ServiceMode::Clean => {
                let timeout = self.settings.timeout_secs();
                if timeout == 0 {
                    self.clear_clipboard();
                } else {
                    self.schedule_or_replace_clear(timeout);
                }
            }
            ServiceMode::ShowContent => {
                self.presenter.present_content(text);
            }
        }
    }

    /// Schedule a clear `timeout` seconds out, superseding any previously
    /// scheduled one. The debounce window restarts from now.
    fn schedule_or_replace_clear(&mut self, timeout: u32) {
        let replaced = self.deadline.is_some();
        self.deadline = Some(Instant::now() + Duration::from_secs(u64::from(timeout)));
        if replaced {
            log::debug!("pending clear superseded, {}s from now", timeout);
        }
        self.presenter
            .transient_message(&clear_scheduled_message(timeout));
    }

    fn clear_clipboard(&mut self) {
        if let Some(latch) = &self.pause_latch {
            latch.pause();
        }
        match self.clipboard.clear() {
            Ok(()) => log::info!("clipboard cleared"),
            Err(e) => log::warn!("failed to clear clipboard: {}", e),
        }
        if let Some(latch) = &self.pause_latch {
            latch.resume();
        }
    }
}

fn clear_scheduled_message(timeout: u32) -> String {
    if timeout == 1 {
        "clipboard will be cleared in 1 second".to_string()
    } else {
        format!("clipboard will be cleared in {} seconds", timeout)
    }
}
