//! User record, roles, and reputation ranks.

use crate::phone::PhoneNumber;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access role of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Reputation tier, derived deterministically from verification points.
///
/// The derivation itself lives in `civis-reputation`; this enum is pure data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    New,
    Trusted,
    Reliable,
    Guardian,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::New => "New",
            Rank::Trusted => "Trusted",
            Rank::Reliable => "Reliable",
            Rank::Guardian => "Guardian",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user. The phone number is the unique identity key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub phone_number: PhoneNumber,
    /// Whether the identity provider has confirmed phone ownership.
    pub is_verified: bool,
    pub role: Role,
    /// May go negative (rejection cascades subtract points).
    pub verification_points: i64,
    /// Invariant: equals `rank_of(verification_points)` after every point
    /// mutation. Only the reputation ledger writes this field.
    pub rank: Rank,
    pub created_at: Timestamp,
}

impl User {
    /// A freshly signed-up user with no reputation.
    pub fn new(phone_number: PhoneNumber, role: Role, now: Timestamp) -> Self {
        Self {
            phone_number,
            is_verified: false,
            role,
            verification_points: 0,
            rank: Rank::New,
            created_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
