//! User-facing presentation
//!
//! The service never renders anything itself; it hands fixed strings to a
//! [`Presenter`]. The shipping implementation logs through the `log`
//! facade, which is all a headless daemon needs. Tests swap in a recorder.

/// Presentation collaborator invoked by the service.
pub trait Presenter: Send {
    /// Short-lived notice, e.g. "clipboard will be cleared in 5 seconds".
    fn transient_message(&self, text: &str);

    /// Long-lived status published while the service runs.
    fn persistent_status(&self, title: &str);

    /// Display the current clipboard content to the user.
    fn present_content(&self, text: &str);
}

/// Presenter that reports through the log facade.
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn transient_message(&self, text: &str) {
        log::info!("{}", text);
    }

    fn persistent_status(&self, title: &str) {
        log::info!("status: {}", title);
    }

    fn present_content(&self, text: &str) {
        log::info!("clipboard content: {}", text);
    }
}

#[cfg(test)]
pub mod recording {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::Presenter;

    /// What a [`RecordingPresenter`] was asked to show.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Shown {
        Transient(String),
        Persistent(String),
        Content(String),
    }

    /// Test presenter that records every call.
    #[derive(Clone, Default)]
    pub struct RecordingPresenter {
        pub calls: Arc<Mutex<Vec<Shown>>>,
    }

    impl RecordingPresenter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn taken(&self) -> Vec<Shown> {
            self.calls.lock().clone()
        }
    }

    impl Presenter for RecordingPresenter {
        fn transient_message(&self, text: &str) {
            self.calls.lock().push(Shown::Transient(text.to_string()));
        }

        fn persistent_status(&self, title: &str) {
            self.calls.lock().push(Shown::Persistent(title.to_string()));
        }

        fn present_content(&self, text: &str) {
            self.calls.lock().push(Shown::Content(text.to_string()));
        }
    }
}
