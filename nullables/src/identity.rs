//! Nullable identity provider — a static credential table.

use civis_service::{IdentityError, IdentityProvider, Principal};
use civis_types::{PhoneNumber, Role};
use std::collections::HashMap;
use std::sync::Mutex;

/// An identity provider backed by an in-memory credential → principal map.
pub struct NullIdentityProvider {
    principals: Mutex<HashMap<String, Principal>>,
}

impl NullIdentityProvider {
    pub fn new() -> Self {
        Self {
            principals: Mutex::new(HashMap::new()),
        }
    }

    /// Register a credential that authenticates as the given identity.
    pub fn register(&self, credential: &str, phone_number: PhoneNumber, role: Role) {
        self.principals.lock().unwrap().insert(
            credential.to_string(),
            Principal { phone_number, role },
        );
    }
}

impl Default for NullIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for NullIdentityProvider {
    fn authenticate(&self, credential: &str) -> Result<Principal, IdentityError> {
        self.principals
            .lock()
            .unwrap()
            .get(credential)
            .cloned()
            .ok_or(IdentityError::Unauthenticated)
    }
}
