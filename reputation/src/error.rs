use civis_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReputationError {
    /// The ledger was invoked for an identity that does not exist.
    ///
    /// Callers only adjust points for users they have just validated, so
    /// this indicates corrupted state, not a routine lookup miss.
    #[error("integrity violation: point adjustment for unknown user {0}")]
    IntegrityViolation(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
