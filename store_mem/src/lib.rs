//! Thread-safe in-memory storage backend.
//!
//! The deployment backend for a single-process Civis service, and the
//! backend every test suite runs against. A persistent backend would
//! implement the same `civis-store` traits.

use civis_store::{ReportStore, StoreError, UserStore};
use civis_types::{PhoneNumber, Report, ReportId, User};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory report + user store.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct MemoryStore {
    reports: Mutex<HashMap<ReportId, Report>>,
    users: Mutex<HashMap<String, User>>,
    next_report_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(HashMap::new()),
            users: Mutex::new(HashMap::new()),
            next_report_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportStore for MemoryStore {
    fn allocate_id(&self) -> Result<ReportId, StoreError> {
        Ok(ReportId::new(
            self.next_report_id.fetch_add(1, Ordering::Relaxed),
        ))
    }

    fn get_report(&self, id: &ReportId) -> Result<Report, StoreError> {
        self.reports
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_report(&self, report: &Report) -> Result<(), StoreError> {
        self.reports
            .lock()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(())
    }

    fn delete_report(&self, id: &ReportId) -> Result<(), StoreError> {
        self.reports
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        let mut reports: Vec<Report> = self.reports.lock().unwrap().values().cloned().collect();
        reports.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(reports)
    }

    fn report_count(&self) -> Result<u64, StoreError> {
        Ok(self.reports.lock().unwrap().len() as u64)
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, phone: &PhoneNumber) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .get(phone.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(phone.to_string()))
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .lock()
            .unwrap()
            .insert(user.phone_number.as_str().to_string(), user.clone());
        Ok(())
    }

    fn exists(&self, phone: &PhoneNumber) -> Result<bool, StoreError> {
        Ok(self.users.lock().unwrap().contains_key(phone.as_str()))
    }

    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}
