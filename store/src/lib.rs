//! Abstract storage traits for the Civis platform.
//!
//! Every storage backend (in-memory, embedded KV, SQL) implements these
//! traits. The rest of the workspace depends only on the traits.
//!
//! The stores are key-addressed and individually consistent; serialization
//! of compound read-modify-write cycles (a verify touches one report and
//! one user, a status cascade touches one report and all its verifiers)
//! is the responsibility of the service layer, which holds per-entity
//! locks for the duration of each operation.

pub mod error;
pub mod report;
pub mod user;

pub use error::StoreError;
pub use report::ReportStore;
pub use user::UserStore;
