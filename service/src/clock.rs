//! Clock abstraction so temporal rules (the undo window) are testable.

use civis_types::Timestamp;

/// Source of the current time for all service operations.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system clock — production implementation.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
