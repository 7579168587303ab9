//! The Civis service — boundary operations over the stores and engines.

use crate::clock::Clock;
use crate::error::ServiceError;
use crate::locks::{report_key, user_key, LockTable};
use crate::notifier::Notifier;
use crate::sms::parse_sms_report;
use crate::stats::Statistics;
use civis_reputation::{apply_delta, ReputationLedger};
use civis_store::{ReportStore, StoreError, UserStore};
use civis_types::{Category, PhoneNumber, PolicyParams, Report, ReportId, ReportStatus, User};
use civis_verification::{build_report, StatusResolver, VerificationEngine, VerificationError};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Longest description prefix included in the new-report alert.
const ALERT_DESCRIPTION_CHARS: usize = 100;

/// The service layer. One instance per process; operations may run
/// concurrently and are serialized per entity by the lock table.
pub struct CivicService {
    reports: Arc<dyn ReportStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    params: PolicyParams,
    engine: VerificationEngine,
    resolver: StatusResolver,
    locks: LockTable,
}

impl CivicService {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        params: PolicyParams,
    ) -> Self {
        Self {
            reports,
            users,
            notifier,
            clock,
            params,
            engine: VerificationEngine,
            resolver: StatusResolver,
            locks: LockTable::new(),
        }
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// Submit a new report. The submitter must be a known user with a
    /// confirmed phone number. Triggers a best-effort admin alert.
    pub async fn submit_report(
        &self,
        title: &str,
        description: &str,
        category: Category,
        created_by: &PhoneNumber,
    ) -> Result<Report, ServiceError> {
        let submitter = self.get_user(created_by)?;
        if !submitter.is_verified {
            return Err(VerificationError::UnverifiedUser(created_by.to_string()).into());
        }

        let id = self.reports.allocate_id()?;
        let now = self.clock.now();
        let report = build_report(
            id,
            title,
            description,
            category,
            created_by.clone(),
            now,
            &self.params,
        )?;
        self.reports.put_report(&report)?;

        let preview: String = report
            .description
            .chars()
            .take(ALERT_DESCRIPTION_CHARS)
            .collect();
        let ellipsis = if report.description.chars().count() > ALERT_DESCRIPTION_CHARS {
            "..."
        } else {
            ""
        };
        let alert = format!(
            "New report received:\nTitle: {}\nCategory: {}\nDescription: {}{}",
            report.title, report.category, preview, ellipsis
        );
        if let Err(e) = self.notifier.notify(&alert) {
            warn!(report = %id, error = %e, "new-report alert failed");
        }

        info!(report = %id, category = %category, "report submitted");
        Ok(report)
    }

    /// Record a verification of `report_id` by `acting`.
    pub async fn verify_report(
        &self,
        report_id: ReportId,
        acting: &PhoneNumber,
    ) -> Result<Report, ServiceError> {
        let _guards = self
            .locks
            .acquire(vec![report_key(&report_id), user_key(acting)])
            .await;

        let user = self.get_user(acting)?;
        self.engine.check_eligibility(&user)?;
        let mut report = self.get_report(&report_id)?;
        let before = report.clone();

        let now = self.clock.now();
        self.engine.verify(&mut report, &user, now, &self.params)?;

        // The report is the source of truth; the point credit follows and
        // is compensated by restoring the report if it fails.
        self.reports.put_report(&report)?;
        let ledger = ReputationLedger::new(self.users.as_ref(), &self.params);
        if let Err(e) = ledger.adjust_points(acting, self.params.verify_reward) {
            self.reports.put_report(&before)?;
            return Err(e.into());
        }

        info!(
            report = %report_id,
            user = %acting,
            count = report.verification_count,
            verified = report.verified,
            "report verification recorded"
        );
        Ok(report)
    }

    /// Retract a verification of `report_id` by `acting`, within the undo
    /// window of the original verification.
    pub async fn undo_verify_report(
        &self,
        report_id: ReportId,
        acting: &PhoneNumber,
    ) -> Result<Report, ServiceError> {
        let _guards = self
            .locks
            .acquire(vec![report_key(&report_id), user_key(acting)])
            .await;

        let user = self.get_user(acting)?;
        let mut report = self.get_report(&report_id)?;
        let before = report.clone();

        let now = self.clock.now();
        self.engine.undo_verify(&mut report, &user, now, &self.params)?;

        self.reports.put_report(&report)?;
        let ledger = ReputationLedger::new(self.users.as_ref(), &self.params);
        if let Err(e) = ledger.adjust_points(acting, -self.params.verify_reward) {
            self.reports.put_report(&before)?;
            return Err(e.into());
        }

        info!(
            report = %report_id,
            user = %acting,
            count = report.verification_count,
            "report verification retracted"
        );
        Ok(report)
    }

    /// Admin triage: set the report's status, optionally attach a comment,
    /// and apply the verifier point cascade for the transition.
    ///
    /// The status write and the cascade are atomic: the operation holds the
    /// report lock plus every verifier's lock, pre-loads every verifier
    /// record (a missing one fails the operation before any write), and
    /// rolls back already-applied user writes if a later write fails.
    pub async fn set_report_status(
        &self,
        report_id: ReportId,
        new_status: ReportStatus,
        comment: Option<&str>,
        acting_admin: &PhoneNumber,
    ) -> Result<Report, ServiceError> {
        let admin = self.get_user(acting_admin)?;
        if !admin.is_admin() {
            return Err(ServiceError::AdminRequired);
        }

        let _report_guard = self.locks.acquire(vec![report_key(&report_id)]).await;
        let mut report = self.get_report(&report_id)?;

        let verifier_keys: Vec<String> = report.verified_by.iter().map(user_key).collect();
        let _verifier_guards = self.locks.acquire(verifier_keys).await;

        let mut verifiers = Vec::with_capacity(report.verified_by.len());
        for identity in &report.verified_by {
            match self.users.get_user(identity) {
                Ok(user) => verifiers.push(user),
                Err(StoreError::NotFound(_)) => {
                    error!(
                        report = %report_id,
                        user = %identity,
                        "verifier record missing during status cascade"
                    );
                    return Err(ServiceError::Integrity(identity.to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }

        let now = self.clock.now();
        let outcome = self.resolver.apply(
            &mut report,
            new_status,
            comment,
            acting_admin,
            now,
            &self.params,
        );

        // Adjustments are listed in verified_by order, matching `verifiers`.
        let mut applied = 0usize;
        for (adjustment, original) in outcome.adjustments.iter().zip(&verifiers) {
            let mut updated = original.clone();
            apply_delta(&mut updated, adjustment.delta, &self.params);
            if let Err(e) = self.users.put_user(&updated) {
                self.rollback_verifiers(&verifiers[..applied]);
                return Err(e.into());
            }
            applied += 1;
        }
        if let Err(e) = self.reports.put_report(&report) {
            self.rollback_verifiers(&verifiers[..applied]);
            return Err(e.into());
        }

        info!(
            report = %report_id,
            old_status = %outcome.old_status,
            new_status = %outcome.new_status,
            adjusted = outcome.adjustments.len(),
            "report status updated"
        );
        Ok(report)
    }

    fn rollback_verifiers(&self, originals: &[User]) {
        for original in originals {
            if let Err(e) = self.users.put_user(original) {
                error!(
                    user = %original.phone_number,
                    error = %e,
                    "cascade rollback write failed"
                );
            }
        }
    }

    /// Admin-only, unconditional delete.
    pub async fn delete_report(
        &self,
        report_id: ReportId,
        acting_admin: &PhoneNumber,
    ) -> Result<(), ServiceError> {
        let admin = self.get_user(acting_admin)?;
        if !admin.is_admin() {
            return Err(ServiceError::AdminRequired);
        }

        let _guard = self.locks.acquire(vec![report_key(&report_id)]).await;
        match self.reports.delete_report(&report_id) {
            Ok(()) => {
                info!(report = %report_id, "report deleted");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                Err(VerificationError::UnknownReport(report_id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_report_by_id(&self, report_id: ReportId) -> Result<Report, ServiceError> {
        self.get_report(&report_id)
    }

    /// All reports, newest first.
    pub fn list_reports(&self) -> Result<Vec<Report>, ServiceError> {
        Ok(self.reports.list_reports()?)
    }

    /// Aggregate platform statistics.
    pub fn statistics(&self) -> Result<Statistics, ServiceError> {
        Ok(Statistics::compute(
            self.reports.as_ref(),
            self.users.as_ref(),
        )?)
    }

    /// Ingest an inbound SMS report: `"Issue: <title> - <description>"`.
    ///
    /// The sender's caller ID is the submitter identity and must belong to
    /// a known, phone-verified user; the category defaults to Services.
    /// A confirmation is sent back through the notifier, best-effort.
    pub async fn ingest_sms(
        &self,
        from: &PhoneNumber,
        body: &str,
    ) -> Result<Report, ServiceError> {
        let parsed = parse_sms_report(body)?;
        let report = self
            .submit_report(&parsed.title, &parsed.description, Category::Services, from)
            .await?;

        if let Err(e) = self
            .notifier
            .notify("Thank you for your report. We will review it shortly.")
        {
            warn!(report = %report.id, error = %e, "sms confirmation failed");
        }
        Ok(report)
    }

    fn get_user(&self, phone: &PhoneNumber) -> Result<User, ServiceError> {
        match self.users.get_user(phone) {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound(_)) => {
                Err(VerificationError::UnknownUser(phone.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get_report(&self, id: &ReportId) -> Result<Report, ServiceError> {
        match self.reports.get_report(id) {
            Ok(report) => Ok(report),
            Err(StoreError::NotFound(_)) => {
                Err(VerificationError::UnknownReport(id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
