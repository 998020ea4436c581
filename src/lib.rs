//! clipsweep - a clipboard-hygiene background service
//!
//! Watches the system clipboard and, depending on the configured mode,
//! clears its content (immediately or after a debounced delay) or surfaces
//! it to the user. A small CLI starts and stops the monitor daemon and
//! adjusts the persisted settings.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod notify;
pub mod process;
pub mod service;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use clipboard::{ClipboardMonitor, SystemClipboard};
use config::SettingsStore;
use notify::LogPresenter;
use service::CleanService;
use storage::{Database, DatabaseError};

/// Run the monitor loop in the foreground until a shutdown signal arrives.
///
/// This is what `clipsweep start` spawns; it is also directly usable under
/// a service manager.
pub async fn run_daemon(db_path: &Path) -> Result<(), DatabaseError> {
    let db = Arc::new(Database::open(db_path)?);
    let settings = SettingsStore::new(db);

    let (tx, rx) = mpsc::unbounded_channel();
    let monitor = ClipboardMonitor::default().start(tx.clone());

    let service = CleanService::new(settings, SystemClipboard, LogPresenter)
        .with_pause_latch(monitor.pause_latch());
    let service_task = tokio::spawn(service.run(rx));

    shutdown_signal().await;
    log::info!("shutdown signal received");

    // Stop the observer first, then close the event channel; the service
    // loop drains, cancels any pending clear, and exits.
    monitor.stop();
    drop(tx);
    if let Err(e) = service_task.await {
        log::error!("service task failed: {}", e);
    }

    log::info!("clipsweep shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            log::error!("failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
