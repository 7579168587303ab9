//! Verification engine — the verify / undo-verify transitions on a report.

use crate::error::VerificationError;
use civis_types::{PolicyParams, Report, Timestamp, User, VerificationRecord};

pub struct VerificationEngine;

impl VerificationEngine {
    /// Checks on the acting user that do not require the report: phone
    /// ownership must be confirmed, and admins do not participate in
    /// community verification.
    ///
    /// Callers run this before loading the report so a caller who is both
    /// ineligible and targeting a missing report hears about eligibility.
    pub fn check_eligibility(&self, user: &User) -> Result<(), VerificationError> {
        if !user.is_verified {
            return Err(VerificationError::UnverifiedUser(
                user.phone_number.to_string(),
            ));
        }
        if user.is_admin() {
            return Err(VerificationError::AdminCannotVerify);
        }
        Ok(())
    }

    /// Record a verification by `user` on `report`.
    ///
    /// On success the caller credits the verify reward through the
    /// reputation ledger and persists the report.
    pub fn verify(
        &self,
        report: &mut Report,
        user: &User,
        now: Timestamp,
        params: &PolicyParams,
    ) -> Result<(), VerificationError> {
        self.check_eligibility(user)?;

        let identity = &user.phone_number;
        if &report.created_by == identity {
            return Err(VerificationError::SelfVerification);
        }
        if report.is_verified_by(identity) {
            return Err(VerificationError::AlreadyVerified(identity.to_string()));
        }

        report.verified_by.push(identity.clone());
        report.verification_timestamps.push(VerificationRecord {
            phone_number: identity.clone(),
            timestamp: now,
        });
        report.verification_count += 1;

        // verified_at marks the moment quorum was first reached; a report
        // already past quorum keeps its original timestamp.
        if report.verification_count >= params.quorum && !report.verified {
            report.verified = true;
            report.verified_at = Some(now);
        }

        Ok(())
    }

    /// Retract a verification by `user` on `report`, allowed only within
    /// the undo window of the original verification.
    ///
    /// On success the caller debits the verify reward through the
    /// reputation ledger and persists the report.
    pub fn undo_verify(
        &self,
        report: &mut Report,
        user: &User,
        now: Timestamp,
        params: &PolicyParams,
    ) -> Result<(), VerificationError> {
        let identity = &user.phone_number;
        if !report.is_verified_by(identity) {
            return Err(VerificationError::NotVerified(identity.to_string()));
        }

        // Every verified_by entry has a paired record; a missing one means
        // the record was corrupted outside the engine.
        let record = report
            .verification_record(identity)
            .ok_or_else(|| VerificationError::MissingVerificationRecord(identity.to_string()))?;

        if record.timestamp.has_expired(params.undo_window_secs, now) {
            return Err(VerificationError::UndoWindowExpired {
                elapsed_secs: record.timestamp.elapsed_since(now),
                window_secs: params.undo_window_secs,
            });
        }

        report.verified_by.retain(|p| p != identity);
        report
            .verification_timestamps
            .retain(|r| &r.phone_number != identity);
        report.verification_count -= 1;

        report.verified = report.verification_count >= params.quorum;
        if !report.verified {
            report.verified_at = None;
        }

        Ok(())
    }
}
