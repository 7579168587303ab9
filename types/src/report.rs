//! Report record and its component types.
//!
//! A `Report` is plain data; every mutation of the verification fields goes
//! through the verification engine, which is the only code allowed to touch
//! `verified_by` / `verification_count` / `verified` / `verified_at`.

use crate::phone::PhoneNumber;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique report identifier, allocated by the report store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(u64);

impl ReportId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// The fixed set of report categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Corruption,
    Services,
    Infrastructure,
    Administrative,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Corruption,
        Category::Services,
        Category::Infrastructure,
        Category::Administrative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Corruption => "corruption",
            Category::Services => "services",
            Category::Infrastructure => "infrastructure",
            Category::Administrative => "administrative",
        }
    }

    /// Parse a category from its lowercase wire name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Triage status of a report. Transitions are admin-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Rejected => "Rejected",
        }
    }

    /// Parse a status from its display name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(ReportStatus::Pending),
            "In Progress" => Some(ReportStatus::InProgress),
            "Resolved" => Some(ReportStatus::Resolved),
            "Rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One verification action: who verified, and when. Drives the undo window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub phone_number: PhoneNumber,
    pub timestamp: Timestamp,
}

/// An admin comment attached to a status transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub by: PhoneNumber,
    pub created_at: Timestamp,
}

/// A citizen-submitted civic issue report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub created_by: PhoneNumber,
    pub created_at: Timestamp,
    /// Distinct identities that have verified this report.
    pub verified_by: Vec<PhoneNumber>,
    /// One record per `verified_by` entry, in verification order.
    pub verification_timestamps: Vec<VerificationRecord>,
    /// Always equal to `verified_by.len()`; denormalized for O(1) quorum checks.
    pub verification_count: u32,
    /// Always equal to `verification_count >= quorum`.
    pub verified: bool,
    /// When the report first reached quorum. Cleared if the count later
    /// drops back below quorum.
    pub verified_at: Option<Timestamp>,
    pub status: ReportStatus,
    /// Append-only admin comment trail.
    pub comments: Vec<Comment>,
}

impl Report {
    /// Whether `identity` has verified this report.
    pub fn is_verified_by(&self, identity: &PhoneNumber) -> bool {
        self.verified_by.contains(identity)
    }

    /// The verification record for `identity`, if any.
    pub fn verification_record(&self, identity: &PhoneNumber) -> Option<&VerificationRecord> {
        self.verification_timestamps
            .iter()
            .find(|r| &r.phone_number == identity)
    }
}
