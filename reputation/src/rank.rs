//! Pure points → rank derivation.

use civis_types::{PolicyParams, Rank};

/// Derive the rank for a point total. Pure function, no side effects.
///
/// Thresholds come from `PolicyParams`:
/// Guardian ≥ guardian_min, Reliable ≥ reliable_min, Trusted ≥ trusted_min,
/// everything below is New.
pub fn rank_of(points: i64, params: &PolicyParams) -> Rank {
    if points >= params.guardian_min_points {
        Rank::Guardian
    } else if points >= params.reliable_min_points {
        Rank::Reliable
    } else if points >= params.trusted_min_points {
        Rank::Trusted
    } else {
        Rank::New
    }
}
