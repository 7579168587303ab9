//! The reputation ledger — load, adjust, re-rank, persist.

use crate::error::ReputationError;
use crate::rank::rank_of;
use civis_store::{StoreError, UserStore};
use civis_types::{PhoneNumber, PolicyParams, User};
use tracing::error;

/// Apply a point delta to a user record in place, re-deriving the rank.
///
/// This is the only mutation path for `verification_points` and `rank`.
pub fn apply_delta(user: &mut User, delta: i64, params: &PolicyParams) {
    user.verification_points += delta;
    user.rank = rank_of(user.verification_points, params);
}

/// The reputation ledger, bound to a user store.
pub struct ReputationLedger<'a, S: UserStore + ?Sized> {
    store: &'a S,
    params: &'a PolicyParams,
}

impl<'a, S: UserStore + ?Sized> ReputationLedger<'a, S> {
    pub fn new(store: &'a S, params: &'a PolicyParams) -> Self {
        Self { store, params }
    }

    /// Add `delta` to the user's points and persist points + rank together.
    ///
    /// The caller must hold the user's entity lock for the duration of the
    /// surrounding operation; the ledger itself does a plain read-modify-write.
    pub fn adjust_points(
        &self,
        identity: &PhoneNumber,
        delta: i64,
    ) -> Result<User, ReputationError> {
        let mut user = match self.store.get_user(identity) {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                error!(%identity, delta, "point adjustment for unknown user");
                return Err(ReputationError::IntegrityViolation(identity.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        apply_delta(&mut user, delta, self.params);
        self.store.put_user(&user)?;
        Ok(user)
    }
}
