//! Aggregate platform statistics for the admin dashboard.

use civis_store::{ReportStore, StoreError, UserStore};
use civis_types::ReportStatus;
use serde::Serialize;
use std::collections::BTreeMap;

/// A snapshot of platform-wide aggregates.
#[derive(Clone, Debug, Serialize)]
pub struct Statistics {
    pub total_reports: u64,
    pub verified_reports: u64,
    pub resolved_reports: u64,
    pub total_users: u64,
    pub admin_users: u64,
    /// Mean time from submission to quorum, in whole hours (rounded),
    /// over reports currently at quorum. Zero when none are.
    pub average_response_hours: u64,
    pub category_distribution: BTreeMap<String, u64>,
    pub status_distribution: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn compute(
        reports: &dyn ReportStore,
        users: &dyn UserStore,
    ) -> Result<Self, StoreError> {
        let all_reports = reports.list_reports()?;
        let all_users = users.list_users()?;

        let mut verified_reports = 0u64;
        let mut resolved_reports = 0u64;
        let mut category_distribution: BTreeMap<String, u64> = BTreeMap::new();
        let mut status_distribution: BTreeMap<String, u64> = BTreeMap::new();
        let mut response_secs_total = 0u64;
        let mut response_count = 0u64;

        for report in &all_reports {
            if report.verified {
                verified_reports += 1;
            }
            if report.status == ReportStatus::Resolved {
                resolved_reports += 1;
            }
            *category_distribution
                .entry(report.category.as_str().to_string())
                .or_insert(0) += 1;
            *status_distribution
                .entry(report.status.as_str().to_string())
                .or_insert(0) += 1;
            if let Some(verified_at) = report.verified_at {
                response_secs_total += report.created_at.elapsed_since(verified_at);
                response_count += 1;
            }
        }

        let average_response_hours = if response_count > 0 {
            ((response_secs_total as f64) / (response_count as f64 * 3600.0)).round() as u64
        } else {
            0
        };

        let admin_users = all_users.iter().filter(|u| u.is_admin()).count() as u64;

        Ok(Self {
            total_reports: all_reports.len() as u64,
            verified_reports,
            resolved_reports,
            total_users: all_users.len() as u64,
            admin_users,
            average_response_hours,
            category_distribution,
            status_distribution,
        })
    }
}
