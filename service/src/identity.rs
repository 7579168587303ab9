//! Identity provider contract.
//!
//! OTP issuance, phone-ownership proof, and session tokens live outside the
//! core; the service only consumes the result: a credential resolves to a
//! phone-number identity and a role, or the request is unauthenticated.

use civis_types::{PhoneNumber, Role};
use thiserror::Error;

/// An authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub phone_number: PhoneNumber,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unauthenticated")]
    Unauthenticated,
}

/// Resolves a request credential to a verified identity.
pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, credential: &str) -> Result<Principal, IdentityError>;
}

/// An identity provider backed by a fixed table of bearer credentials, for
/// deployments where session issuance happens out of band (the daemon
/// loads the table from its configuration).
pub struct StaticIdentityProvider {
    principals: std::collections::HashMap<String, Principal>,
}

impl StaticIdentityProvider {
    pub fn with_credentials(entries: impl IntoIterator<Item = (String, Principal)>) -> Self {
        Self {
            principals: entries.into_iter().collect(),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn authenticate(&self, credential: &str) -> Result<Principal, IdentityError> {
        self.principals
            .get(credential)
            .cloned()
            .ok_or(IdentityError::Unauthenticated)
    }
}
