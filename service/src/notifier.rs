//! Notifier contract — best-effort out-of-band alerts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(String),
}

/// Delivers out-of-band alerts (admin notifications, SMS confirmations).
///
/// Fire-and-forget: callers log failures and never propagate them.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str) -> Result<(), NotifyError>;
}
