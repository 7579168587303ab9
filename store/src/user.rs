//! User storage trait.

use crate::StoreError;
use civis_types::{PhoneNumber, User};

/// Trait for storing user records, keyed by phone number.
pub trait UserStore: Send + Sync {
    /// Fetch a user by phone number.
    fn get_user(&self, phone: &PhoneNumber) -> Result<User, StoreError>;

    /// Insert or replace a user.
    fn put_user(&self, user: &User) -> Result<(), StoreError>;

    fn exists(&self, phone: &PhoneNumber) -> Result<bool, StoreError>;

    /// All users, in no particular order.
    fn list_users(&self) -> Result<Vec<User>, StoreError>;

    fn user_count(&self) -> Result<u64, StoreError>;
}
