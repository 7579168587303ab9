//! Policy parameters — every tunable constant of the verification and
//! reputation rules, externalized so no threshold is a magic literal
//! scattered through engine logic.

use serde::{Deserialize, Serialize};

/// All policy parameters for the Civis platform.
///
/// Loaded from the service configuration; defaults match the production
/// policy (quorum of 3, one-hour undo window).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyParams {
    // ── Verification ─────────────────────────────────────────────────────
    /// Distinct verifiers required before a report is community-verified.
    pub quorum: u32,

    /// Seconds after a verification during which it may be retracted.
    pub undo_window_secs: u64,

    // ── Reputation ───────────────────────────────────────────────────────
    /// Points credited for a verification (and debited on undo).
    pub verify_reward: i64,

    /// Points credited to every verifier when a report is resolved.
    pub resolve_bonus: i64,

    /// Points delta applied to every verifier when a report is rejected
    /// (negative).
    pub reject_penalty: i64,

    /// Minimum points for the Trusted rank.
    pub trusted_min_points: i64,

    /// Minimum points for the Reliable rank.
    pub reliable_min_points: i64,

    /// Minimum points for the Guardian rank.
    pub guardian_min_points: i64,

    // ── Submission ───────────────────────────────────────────────────────
    /// Minimum report title length in characters.
    pub min_title_len: usize,

    /// Minimum report description length in characters.
    pub min_description_len: usize,
}

impl PolicyParams {
    /// Civis production defaults.
    pub fn civis_defaults() -> Self {
        Self {
            quorum: 3,
            undo_window_secs: 3600, // 1 hour

            verify_reward: 1,
            resolve_bonus: 2,
            reject_penalty: -1,

            trusted_min_points: 5,
            reliable_min_points: 10,
            guardian_min_points: 20,

            min_title_len: 5,
            min_description_len: 20,
        }
    }
}

/// Default is the production configuration.
impl Default for PolicyParams {
    fn default() -> Self {
        Self::civis_defaults()
    }
}
