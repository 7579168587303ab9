use civis_reputation::ReputationError;
use civis_store::StoreError;
use civis_verification::VerificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("admin privileges required")]
    AdminRequired,

    /// State the engine already validated turned out to be missing or
    /// inconsistent. Unexpected by construction; logged at error level
    /// where it is detected.
    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("invalid message format, expected \"Issue: <title> - <description>\"")]
    MalformedSmsBody,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<ReputationError> for ServiceError {
    fn from(e: ReputationError) -> Self {
        match e {
            ReputationError::IntegrityViolation(identity) => ServiceError::Integrity(identity),
            ReputationError::Store(e) => ServiceError::Store(e),
        }
    }
}
