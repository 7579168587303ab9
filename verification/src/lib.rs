//! Report verification state machine.
//!
//! Three pieces:
//! 1. **Submission**: validated construction of a new report.
//! 2. **Verification engine**: the quorum/undo transitions on a single
//!    report — who may verify, the one-hour retraction window, and the
//!    denormalized `verification_count` / `verified` / `verified_at` fields
//!    maintained by a single mutation routine.
//! 3. **Status resolver**: admin triage transitions and the reputation
//!    adjustment batch they trigger for the report's verifiers.
//!
//! Everything here is a pure transition over `&mut Report` with an injected
//! `now`; storage, locking, and point persistence live in the service layer.

pub mod engine;
pub mod error;
pub mod status;
pub mod submit;

pub use engine::VerificationEngine;
pub use error::{ErrorClass, VerificationError};
pub use status::{PointAdjustment, StatusOutcome, StatusResolver};
pub use submit::build_report;
