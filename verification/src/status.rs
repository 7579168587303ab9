//! Status resolver — admin triage transitions and the reputation
//! adjustment batch they trigger.
//!
//! The resolver mutates the report and *computes* the per-verifier point
//! adjustments as data; the service layer applies them through the
//! reputation ledger under its atomicity regime. Keeping the cascade as an
//! explicit batch (rather than an implicit loop with independent per-item
//! failure) is what lets the caller make the whole transition atomic.

use civis_types::{Comment, PhoneNumber, PolicyParams, Report, ReportStatus, Timestamp};

/// One pending reputation adjustment produced by a status transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointAdjustment {
    pub identity: PhoneNumber,
    pub delta: i64,
}

/// The result of applying a status transition.
#[derive(Clone, Debug)]
pub struct StatusOutcome {
    pub old_status: ReportStatus,
    pub new_status: ReportStatus,
    /// Reputation adjustments for the report's verifiers, empty unless the
    /// transition entered Resolved or Rejected from a different status.
    pub adjustments: Vec<PointAdjustment>,
}

pub struct StatusResolver;

impl StatusResolver {
    /// Set the report's status, append the optional admin comment, and
    /// compute the verifier point cascade for the transition.
    ///
    /// The cascade is keyed on the transition, not the destination state:
    /// re-issuing the current status produces no adjustments.
    pub fn apply(
        &self,
        report: &mut Report,
        new_status: ReportStatus,
        comment: Option<&str>,
        acting_admin: &PhoneNumber,
        now: Timestamp,
        params: &PolicyParams,
    ) -> StatusOutcome {
        let old_status = report.status;
        report.status = new_status;

        if let Some(text) = comment {
            report.comments.push(Comment {
                text: text.to_string(),
                by: acting_admin.clone(),
                created_at: now,
            });
        }

        let delta = match (old_status, new_status) {
            (old, ReportStatus::Resolved) if old != ReportStatus::Resolved => {
                Some(params.resolve_bonus)
            }
            (old, ReportStatus::Rejected) if old != ReportStatus::Rejected => {
                Some(params.reject_penalty)
            }
            _ => None,
        };

        let adjustments = match delta {
            Some(delta) => report
                .verified_by
                .iter()
                .map(|identity| PointAdjustment {
                    identity: identity.clone(),
                    delta,
                })
                .collect(),
            None => Vec::new(),
        };

        StatusOutcome {
            old_status,
            new_status,
            adjustments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civis_types::{Category, ReportId};

    fn phone(s: &str) -> PhoneNumber {
        PhoneNumber::new(s)
    }

    fn verified_report(verifiers: &[&str]) -> Report {
        let verified_by: Vec<PhoneNumber> = verifiers.iter().map(|s| phone(s)).collect();
        let verification_timestamps = verified_by
            .iter()
            .map(|p| civis_types::VerificationRecord {
                phone_number: p.clone(),
                timestamp: Timestamp::new(50),
            })
            .collect();
        Report {
            id: ReportId::new(7),
            title: "Missing manhole cover".to_string(),
            description: "Open manhole on the corner of Oak and 3rd street".to_string(),
            category: Category::Infrastructure,
            created_by: phone("5550000001"),
            created_at: Timestamp::new(0),
            verification_count: verified_by.len() as u32,
            verified: verified_by.len() >= 3,
            verified_at: if verified_by.len() >= 3 {
                Some(Timestamp::new(50))
            } else {
                None
            },
            verified_by,
            verification_timestamps,
            status: ReportStatus::Pending,
            comments: Vec::new(),
        }
    }

    #[test]
    fn resolution_rewards_every_verifier() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&["5550000002", "5550000003", "5550000004"]);

        let outcome = resolver.apply(
            &mut report,
            ReportStatus::Resolved,
            None,
            &phone("5559990000"),
            Timestamp::new(100),
            &params,
        );

        assert_eq!(report.status, ReportStatus::Resolved);
        assert_eq!(outcome.adjustments.len(), 3);
        assert!(outcome.adjustments.iter().all(|a| a.delta == 2));
    }

    #[test]
    fn rejection_penalizes_every_verifier() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&["5550000002", "5550000003"]);

        let outcome = resolver.apply(
            &mut report,
            ReportStatus::Rejected,
            None,
            &phone("5559990000"),
            Timestamp::new(100),
            &params,
        );

        assert_eq!(outcome.adjustments.len(), 2);
        assert!(outcome.adjustments.iter().all(|a| a.delta == -1));
    }

    #[test]
    fn repeated_resolution_is_idempotent() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&["5550000002", "5550000003", "5550000004"]);

        let first = resolver.apply(
            &mut report,
            ReportStatus::Resolved,
            None,
            &phone("5559990000"),
            Timestamp::new(100),
            &params,
        );
        let second = resolver.apply(
            &mut report,
            ReportStatus::Resolved,
            None,
            &phone("5559990000"),
            Timestamp::new(200),
            &params,
        );

        assert_eq!(first.adjustments.len(), 3);
        assert!(second.adjustments.is_empty());
    }

    #[test]
    fn rejection_then_resolution_fires_both_cascades() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&["5550000002", "5550000003", "5550000004"]);
        let admin = phone("5559990000");

        let rejected = resolver.apply(
            &mut report,
            ReportStatus::Rejected,
            None,
            &admin,
            Timestamp::new(100),
            &params,
        );
        assert!(rejected.adjustments.iter().all(|a| a.delta == -1));

        // Old status Rejected != Resolved, so the resolve cascade fires.
        let resolved = resolver.apply(
            &mut report,
            ReportStatus::Resolved,
            None,
            &admin,
            Timestamp::new(200),
            &params,
        );
        assert_eq!(resolved.adjustments.len(), 3);
        assert!(resolved.adjustments.iter().all(|a| a.delta == 2));
    }

    #[test]
    fn neutral_transition_has_no_cascade() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&["5550000002", "5550000003", "5550000004"]);

        let outcome = resolver.apply(
            &mut report,
            ReportStatus::InProgress,
            Some("Crew dispatched"),
            &phone("5559990000"),
            Timestamp::new(100),
            &params,
        );

        assert!(outcome.adjustments.is_empty());
        assert_eq!(report.status, ReportStatus::InProgress);
    }

    #[test]
    fn comment_is_appended_with_author_and_time() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&["5550000002"]);
        let admin = phone("5559990000");

        resolver.apply(
            &mut report,
            ReportStatus::InProgress,
            Some("Assigned to public works"),
            &admin,
            Timestamp::new(123),
            &params,
        );
        resolver.apply(
            &mut report,
            ReportStatus::Resolved,
            Some("Fixed"),
            &admin,
            Timestamp::new(456),
            &params,
        );

        assert_eq!(report.comments.len(), 2);
        assert_eq!(report.comments[0].text, "Assigned to public works");
        assert_eq!(report.comments[1].by, admin);
        assert_eq!(report.comments[1].created_at, Timestamp::new(456));
    }

    #[test]
    fn no_cascade_when_no_verifiers() {
        let resolver = StatusResolver;
        let params = PolicyParams::civis_defaults();
        let mut report = verified_report(&[]);

        let outcome = resolver.apply(
            &mut report,
            ReportStatus::Resolved,
            None,
            &phone("5559990000"),
            Timestamp::new(100),
            &params,
        );
        assert!(outcome.adjustments.is_empty());
    }
}
