//! Report storage trait.

use crate::StoreError;
use civis_types::{Report, ReportId};

/// Trait for storing report records, keyed by `ReportId`.
pub trait ReportStore: Send + Sync {
    /// Allocate a fresh, never-before-issued report id.
    fn allocate_id(&self) -> Result<ReportId, StoreError>;

    /// Fetch a report by id.
    fn get_report(&self, id: &ReportId) -> Result<Report, StoreError>;

    /// Insert or replace a report.
    fn put_report(&self, report: &Report) -> Result<(), StoreError>;

    /// Remove a report. Errors with `NotFound` if absent.
    fn delete_report(&self, id: &ReportId) -> Result<(), StoreError>;

    /// All reports, newest first.
    fn list_reports(&self) -> Result<Vec<Report>, StoreError>;

    fn report_count(&self) -> Result<u64, StoreError>;
}
