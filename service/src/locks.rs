//! Per-entity lock table.
//!
//! Serializes mutations per report and per user without a global lock.
//! Every operation acquires all the entity locks it touches in one batch;
//! the batch is sorted before acquisition, and report keys (`report/…`)
//! sort before user keys (`user/…`), so every acquisition sequence in the
//! process follows the same global order and cannot deadlock — including
//! the status cascade, which locks one report and then its verifier set.

use civis_types::{PhoneNumber, ReportId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as EntityMutex, OwnedMutexGuard};

/// Lock-table key for a report.
pub fn report_key(id: &ReportId) -> String {
    format!("report/{id}")
}

/// Lock-table key for a user.
pub fn user_key(phone: &PhoneNumber) -> String {
    format!("user/{phone}")
}

/// A registry of named entity locks.
pub struct LockTable {
    entries: Mutex<HashMap<String, Arc<EntityMutex<()>>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, key: &str) -> Arc<EntityMutex<()>> {
        self.entries
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Acquire every key in the batch, sorted and deduplicated.
    ///
    /// The returned guards release on drop. Holding guards from a previous
    /// `acquire` while calling this again is safe only if every key in the
    /// new batch sorts after every held key.
    pub async fn acquire(&self, mut keys: Vec<String>) -> Vec<OwnedMutexGuard<()>> {
        keys.sort();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let lock = self.entry(&key);
            guards.push(lock.lock_owned().await);
        }
        guards
    }
}

impl Default for LockTable {
    fn default() -> Self {
        Self::new()
    }
}
