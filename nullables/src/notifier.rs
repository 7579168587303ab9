//! Nullable notifier — records messages instead of delivering them.

use civis_service::{Notifier, NotifyError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A notifier that captures every message for later inspection, and can be
/// armed to fail so callers' log-and-continue behavior is testable.
pub struct NullNotifier {
    sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `notify` call fail.
    pub fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NullNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NullNotifier {
    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport("null notifier armed to fail".into()));
        }
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
